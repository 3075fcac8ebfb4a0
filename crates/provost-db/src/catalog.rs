//! SurrealDB implementation of the master [`Catalog`].

use chrono::{DateTime, Utc};
use provost_core::error::{ProvostError, ProvostResult};
use provost_core::models::admin::{Admin, NewAdmin};
use provost_core::models::organization::{NewOrganization, Organization};
use provost_core::repository::Catalog;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    organization_name: String,
    organization_name_lower: String,
    admin_email: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    organization_name: String,
    organization_name_lower: String,
    admin_email: String,
    created_at: DateTime<Utc>,
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Organization {
            id,
            organization_name: self.organization_name,
            organization_name_lower: self.organization_name_lower,
            admin_email: self.admin_email,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct AdminRow {
    email: String,
    hashed_password: String,
    organization_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AdminRowWithId {
    record_id: String,
    email: String,
    hashed_password: String,
    organization_id: String,
    created_at: DateTime<Utc>,
}

impl AdminRowWithId {
    fn try_into_admin(self) -> Result<Admin, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Admin {
            id,
            email: self.email,
            hashed_password: self.hashed_password,
            organization_id,
            created_at: self.created_at,
        })
    }
}

/// Check a response, translating a unique-index violation into
/// [`ProvostError::Conflict`] on the given name.
fn check_unique(
    result: surrealdb::IndexedResults,
    name: &str,
) -> Result<surrealdb::IndexedResults, ProvostError> {
    result.check().map_err(|e| {
        let msg = e.to_string();
        // SurrealDB reports unique index violations as
        // "Database index `...` already contains ...".
        if msg.contains("already contains") {
            ProvostError::Conflict {
                name: name.to_string(),
            }
        } else {
            DbError::Query(msg).into()
        }
    })
}

/// SurrealDB implementation of the master catalog, pinned to the
/// master database session.
#[derive(Clone)]
pub struct SurrealCatalog<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCatalog<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> Catalog for SurrealCatalog<C> {
    async fn insert_org(&self, input: NewOrganization) -> ProvostResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organizations', $id) SET \
                 organization_name = $name, \
                 organization_name_lower = $name_lower, \
                 admin_email = $email",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.organization_name))
            .bind(("name_lower", input.organization_name_lower.clone()))
            .bind(("email", input.admin_email))
            .await
            .map_err(DbError::from)?;

        // The unique index on organization_name_lower fires here: this
        // is the authoritative conflict, not the caller's pre-check.
        let mut result = check_unique(result, &input.organization_name_lower)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "organization".into(),
            key: id_str,
        })?;

        Ok(Organization {
            id,
            organization_name: row.organization_name,
            organization_name_lower: row.organization_name_lower,
            admin_email: row.admin_email,
            created_at: row.created_at,
        })
    }

    async fn find_org(&self, name_lower: &str) -> ProvostResult<Option<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organizations \
                 WHERE organization_name_lower = $name_lower",
            )
            .bind(("name_lower", name_lower.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_organization()?)),
            None => Ok(None),
        }
    }

    async fn get_org(&self, name_lower: &str) -> ProvostResult<Organization> {
        self.find_org(name_lower)
            .await?
            .ok_or_else(|| ProvostError::NotFound {
                entity: "organization".into(),
                key: name_lower.to_string(),
            })
    }

    async fn rename_org(
        &self,
        id: Uuid,
        new_name: &str,
        new_name_lower: &str,
    ) -> ProvostResult<Organization> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('organizations', $id) SET \
                 organization_name = $name, \
                 organization_name_lower = $name_lower",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", new_name.to_string()))
            .bind(("name_lower", new_name_lower.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = check_unique(result, new_name_lower)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "organization".into(),
            key: id_str,
        })?;

        Ok(Organization {
            id,
            organization_name: row.organization_name,
            organization_name_lower: row.organization_name_lower,
            admin_email: row.admin_email,
            created_at: row.created_at,
        })
    }

    async fn delete_org(&self, id: Uuid) -> ProvostResult<()> {
        // Surreal defers statement errors into the response; a delete
        // that fails must surface to the orchestrator's compensation
        // logging, not vanish.
        self.db
            .query("DELETE type::record('organizations', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn insert_admin(&self, input: NewAdmin) -> ProvostResult<Admin> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('admins', $id) SET \
                 email = $email, \
                 hashed_password = $hashed_password, \
                 organization_id = $organization_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email.clone()))
            .bind(("hashed_password", input.hashed_password))
            .bind(("organization_id", input.organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = check_unique(result, &input.email)?;

        let rows: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "admin".into(),
            key: id_str,
        })?;

        let organization_id = Uuid::parse_str(&row.organization_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;

        Ok(Admin {
            id,
            email: row.email,
            hashed_password: row.hashed_password,
            organization_id,
            created_at: row.created_at,
        })
    }

    async fn find_admin(&self, email: &str) -> ProvostResult<Option<Admin>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM admins WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_admin()?)),
            None => Ok(None),
        }
    }

    async fn delete_admins(&self, organization_id: Uuid) -> ProvostResult<()> {
        self.db
            .query("DELETE admins WHERE organization_id = $organization_id")
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }
}
