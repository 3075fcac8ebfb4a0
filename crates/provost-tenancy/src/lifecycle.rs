//! Organization lifecycle orchestration.
//!
//! Create, rename, and delete each touch the master catalog and a
//! tenant store — two independently-failing resources. Each operation
//! is a short step sequence with explicit compensating actions instead
//! of a transaction: on partial failure the orchestrator repairs the
//! catalog side and logs whatever it could not repair, so no catalog
//! entry ever points at a missing store without a trace.

use chrono::Utc;
use provost_auth::config::AuthConfig;
use provost_auth::error::AuthError;
use provost_auth::{gate, password, token};
use provost_core::error::{ProvostError, ProvostResult};
use provost_core::models::admin::NewAdmin;
use provost_core::models::organization::{CreateOrganization, NewOrganization, Organization};
use provost_core::models::tenant::TenantMetadata;
use provost_core::repository::{Catalog, TenantStores};
use provost_core::sanitize::{sanitize, tenant_store_name};
use tracing::{error, info, warn};

/// Bounds enforced on create and update payloads.
pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed HS256 access token, `sub` = admin email.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
}

/// Lifecycle orchestrator.
///
/// Generic over repository implementations so the orchestration layer
/// has no dependency on the database crate and tests can substitute
/// in-memory instances with failpoints.
pub struct Lifecycle<C: Catalog, S: TenantStores> {
    catalog: C,
    stores: S,
    auth: AuthConfig,
}

impl<C: Catalog, S: TenantStores> Lifecycle<C, S> {
    pub fn new(catalog: C, stores: S, auth: AuthConfig) -> Self {
        Self {
            catalog,
            stores,
            auth,
        }
    }

    /// Authenticate an admin by email and password and issue a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password_input: &str) -> ProvostResult<LoginOutput> {
        let admin = self
            .catalog
            .find_admin(email)
            .await?
            .ok_or_else(|| ProvostError::from(AuthError::InvalidCredentials))?;

        let valid = password::verify_password(password_input, &admin.hashed_password)
            .map_err(ProvostError::from)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_token(&admin.email, &self.auth)?;
        Ok(LoginOutput {
            access_token,
            token_type: "bearer",
        })
    }

    /// Create an organization, its admin, and its tenant store.
    ///
    /// Step order: validate, sanitize, uniqueness pre-check, hash
    /// password, insert org, insert admin, provision store. A failure
    /// after the catalog inserts triggers best-effort compensation
    /// deleting the inserted records; a store left behind by a failed
    /// provision is logged for operator cleanup, never auto-dropped.
    pub async fn create(&self, input: CreateOrganization) -> ProvostResult<Organization> {
        validate_create(&input)?;
        let name_lower = sanitized_nonempty(&input.organization_name)?;

        // Fast-path friendly error; the unique index on the insert is
        // the authoritative enforcement point.
        if self.catalog.find_org(&name_lower).await?.is_some() {
            return Err(ProvostError::Conflict { name: name_lower });
        }

        let hashed_password = password::hash_password(&input.password).map_err(ProvostError::from)?;

        let org = self
            .catalog
            .insert_org(NewOrganization {
                organization_name: input.organization_name.clone(),
                organization_name_lower: name_lower.clone(),
                admin_email: input.email.clone(),
            })
            .await?;

        if let Err(e) = self
            .catalog
            .insert_admin(NewAdmin {
                email: input.email.clone(),
                hashed_password,
                organization_id: org.id,
            })
            .await
        {
            error!(org = %name_lower, error = %e, "admin insert failed, compensating");
            self.compensate_catalog(&org, false).await;
            return Err(ProvostError::Internal(
                "failed to create organization admin".into(),
            ));
        }

        let store = tenant_store_name(&name_lower);
        if let Err(e) = self
            .stores
            .provision(
                &store,
                TenantMetadata {
                    organization_id: org.id,
                    organization_name: input.organization_name.clone(),
                    created_at: Utc::now(),
                },
            )
            .await
        {
            error!(org = %name_lower, store = %store, error = %e,
                "tenant provisioning failed, compensating catalog records");
            self.compensate_catalog(&org, true).await;
            warn!(store = %store,
                "a partially-created tenant store may remain; flagged for operator cleanup");
            return Err(ProvostError::Internal(
                "failed to provision tenant store".into(),
            ));
        }

        info!(org = %name_lower, store = %store, "organization created");
        Ok(org)
    }

    /// Look up an organization by (display or sanitized) name.
    pub async fn get(&self, organization_name: &str) -> ProvostResult<Organization> {
        let name_lower = sanitized_nonempty(organization_name)?;
        self.catalog.get_org(&name_lower).await
    }

    /// Rename an organization in the catalog only.
    ///
    /// Tenant data keeps its old physical store; physically relocating
    /// it is the migration engine's separately-invoked job.
    pub async fn rename(
        &self,
        bearer_token: &str,
        organization_name: &str,
        new_name: &str,
    ) -> ProvostResult<Organization> {
        let old_lower = sanitized_nonempty(organization_name)?;
        let org = self.catalog.get_org(&old_lower).await?;
        gate::authorize_admin(bearer_token, &org, &self.auth)?;

        validate_name(new_name)?;
        let new_lower = sanitized_nonempty(new_name)?;

        // A different org already owning the new sanitized name is a
        // conflict; the org itself holding it (display-only rename) is
        // not.
        if new_lower != old_lower
            && self.catalog.find_org(&new_lower).await?.is_some()
        {
            return Err(ProvostError::Conflict { name: new_lower });
        }

        let renamed = self.catalog.rename_org(org.id, new_name, &new_lower).await?;
        info!(org = %old_lower, new = %new_lower,
            "organization renamed in catalog; tenant store unchanged");
        Ok(renamed)
    }

    /// Delete an organization, its admin, and its tenant store.
    ///
    /// Catalog records go first: if the store drop then fails, the
    /// catalog no longer references it — the failure mode is an
    /// orphaned store flagged for manual cleanup, not a dangling
    /// catalog entry.
    pub async fn delete(&self, bearer_token: &str, organization_name: &str) -> ProvostResult<()> {
        let subject = gate::subject(bearer_token, &self.auth)?;
        let name_lower = sanitized_nonempty(organization_name)?;
        let org = self.catalog.get_org(&name_lower).await?;

        if subject != org.admin_email {
            return Err(ProvostError::Forbidden {
                reason: "not the admin of this organization".into(),
            });
        }

        self.catalog.delete_admins(org.id).await?;
        self.catalog.delete_org(org.id).await?;

        let store = tenant_store_name(&name_lower);
        if let Err(e) = self.stores.deprovision(&store).await {
            error!(store = %store, error = %e,
                "tenant store drop failed after catalog delete; orphaned store requires manual cleanup");
            return Err(ProvostError::Internal(
                "organization removed from catalog but tenant store could not be dropped".into(),
            ));
        }

        info!(org = %name_lower, store = %store, "organization deleted");
        Ok(())
    }

    /// Best-effort removal of the catalog records inserted by a failed
    /// create. Each compensating step is logged; none is retried.
    async fn compensate_catalog(&self, org: &Organization, admin_inserted: bool) {
        if admin_inserted {
            match self.catalog.delete_admins(org.id).await {
                Ok(()) => info!(org = %org.organization_name_lower, "compensation: admin record removed"),
                Err(e) => error!(org = %org.organization_name_lower, error = %e,
                    "compensation failed: admin record may remain"),
            }
        }
        match self.catalog.delete_org(org.id).await {
            Ok(()) => info!(org = %org.organization_name_lower, "compensation: organization record removed"),
            Err(e) => error!(org = %org.organization_name_lower, error = %e,
                "compensation failed: organization record may remain"),
        }
    }
}

fn validate_create(input: &CreateOrganization) -> ProvostResult<()> {
    validate_name(&input.organization_name)?;
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(ProvostError::Validation {
            message: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    if !input.email.contains('@') {
        return Err(ProvostError::Validation {
            message: "invalid email address".into(),
        });
    }
    Ok(())
}

fn validate_name(name: &str) -> ProvostResult<()> {
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ProvostError::Validation {
            message: format!(
                "organization name must be {MIN_NAME_LEN}-{MAX_NAME_LEN} characters"
            ),
        });
    }
    Ok(())
}

/// Sanitize a name, rejecting input that sanitizes to nothing.
fn sanitized_nonempty(name: &str) -> ProvostResult<String> {
    let lower = sanitize(name);
    if lower.is_empty() {
        return Err(ProvostError::Validation {
            message: "organization name contains no usable characters".into(),
        });
    }
    Ok(lower)
}
