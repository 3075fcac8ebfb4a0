//! Integration tests for the master catalog implementation using
//! in-memory SurrealDB.

use provost_core::error::ProvostError;
use provost_core::models::admin::NewAdmin;
use provost_core::models::organization::NewOrganization;
use provost_core::repository::Catalog;
use provost_db::SurrealCatalog;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> SurrealCatalog<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("master").await.unwrap();
    provost_db::run_migrations(&db).await.unwrap();
    SurrealCatalog::new(db)
}

fn acme() -> NewOrganization {
    NewOrganization {
        organization_name: "Acme Corp".into(),
        organization_name_lower: "acme_corp".into(),
        admin_email: "owner@acme.com".into(),
    }
}

#[tokio::test]
async fn insert_and_find_organization() {
    let catalog = setup().await;

    let org = catalog.insert_org(acme()).await.unwrap();
    assert_eq!(org.organization_name, "Acme Corp");
    assert_eq!(org.organization_name_lower, "acme_corp");
    assert_eq!(org.admin_email, "owner@acme.com");

    let found = catalog.find_org("acme_corp").await.unwrap().unwrap();
    assert_eq!(found.id, org.id);
    assert_eq!(found.organization_name, "Acme Corp");

    assert!(catalog.find_org("no_such_org").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_duplicate_sanitized_name_is_conflict() {
    let catalog = setup().await;
    catalog.insert_org(acme()).await.unwrap();

    let dup = NewOrganization {
        organization_name: "ACME CORP".into(),
        organization_name_lower: "acme_corp".into(),
        admin_email: "other@acme.com".into(),
    };
    let err = catalog.insert_org(dup).await.unwrap_err();
    assert!(matches!(err, ProvostError::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn get_org_reports_not_found() {
    let catalog = setup().await;
    let err = catalog.get_org("missing").await.unwrap_err();
    assert!(matches!(err, ProvostError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn rename_updates_both_name_fields() {
    let catalog = setup().await;
    let org = catalog.insert_org(acme()).await.unwrap();

    let renamed = catalog
        .rename_org(org.id, "Acme Industries", "acme_industries")
        .await
        .unwrap();
    assert_eq!(renamed.id, org.id);
    assert_eq!(renamed.organization_name, "Acme Industries");
    assert_eq!(renamed.organization_name_lower, "acme_industries");

    // The old sanitized name no longer resolves, the new one does.
    assert!(catalog.find_org("acme_corp").await.unwrap().is_none());
    let found = catalog.get_org("acme_industries").await.unwrap();
    assert_eq!(found.id, org.id);
}

#[tokio::test]
async fn rename_onto_taken_name_is_conflict() {
    let catalog = setup().await;
    let org = catalog.insert_org(acme()).await.unwrap();
    catalog
        .insert_org(NewOrganization {
            organization_name: "Globex".into(),
            organization_name_lower: "globex".into(),
            admin_email: "owner@globex.com".into(),
        })
        .await
        .unwrap();

    let err = catalog
        .rename_org(org.id, "Globex", "globex")
        .await
        .unwrap_err();
    assert!(matches!(err, ProvostError::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn delete_org_frees_the_name() {
    let catalog = setup().await;
    let org = catalog.insert_org(acme()).await.unwrap();

    catalog.delete_org(org.id).await.unwrap();
    assert!(catalog.find_org("acme_corp").await.unwrap().is_none());

    // Reinsert under the same sanitized name succeeds.
    catalog.insert_org(acme()).await.unwrap();
}

#[tokio::test]
async fn admin_roundtrip() {
    let catalog = setup().await;
    let org = catalog.insert_org(acme()).await.unwrap();

    let admin = catalog
        .insert_admin(NewAdmin {
            email: "owner@acme.com".into(),
            hashed_password: "$argon2id$stub".into(),
            organization_id: org.id,
        })
        .await
        .unwrap();
    assert_eq!(admin.organization_id, org.id);

    let found = catalog.find_admin("owner@acme.com").await.unwrap().unwrap();
    assert_eq!(found.id, admin.id);
    assert_eq!(found.hashed_password, "$argon2id$stub");

    assert!(catalog.find_admin("ghost@acme.com").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_admins_removes_only_the_orgs_admins() {
    let catalog = setup().await;
    let org_a = catalog.insert_org(acme()).await.unwrap();
    let org_b = catalog
        .insert_org(NewOrganization {
            organization_name: "Globex".into(),
            organization_name_lower: "globex".into(),
            admin_email: "owner@globex.com".into(),
        })
        .await
        .unwrap();

    catalog
        .insert_admin(NewAdmin {
            email: "owner@acme.com".into(),
            hashed_password: "a".into(),
            organization_id: org_a.id,
        })
        .await
        .unwrap();
    catalog
        .insert_admin(NewAdmin {
            email: "owner@globex.com".into(),
            hashed_password: "b".into(),
            organization_id: org_b.id,
        })
        .await
        .unwrap();

    catalog.delete_admins(org_a.id).await.unwrap();

    assert!(catalog.find_admin("owner@acme.com").await.unwrap().is_none());
    assert!(catalog.find_admin("owner@globex.com").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_admins_with_no_admins_is_a_no_op() {
    let catalog = setup().await;
    catalog.delete_admins(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn delete_org_surfaces_statement_errors() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("master").await.unwrap();
    provost_db::run_migrations(&db).await.unwrap();
    let catalog = SurrealCatalog::new(db.clone());

    let org = catalog.insert_org(acme()).await.unwrap();

    // An event that throws on delete turns the statement into a
    // deferred error inside the response.
    db.query(
        "DEFINE EVENT block_delete ON TABLE organizations \
         WHEN $event = 'DELETE' THEN { THROW 'delete blocked' }",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let err = catalog.delete_org(org.id).await.unwrap_err();
    assert!(matches!(err, ProvostError::Database(_)), "got: {err:?}");

    // The failed delete left the record in place.
    assert!(catalog.find_org("acme_corp").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_admins_surfaces_statement_errors() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("master").await.unwrap();
    provost_db::run_migrations(&db).await.unwrap();
    let catalog = SurrealCatalog::new(db.clone());

    let org = catalog.insert_org(acme()).await.unwrap();
    catalog
        .insert_admin(NewAdmin {
            email: "owner@acme.com".into(),
            hashed_password: "x".into(),
            organization_id: org.id,
        })
        .await
        .unwrap();

    db.query(
        "DEFINE EVENT block_delete ON TABLE admins \
         WHEN $event = 'DELETE' THEN { THROW 'delete blocked' }",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let err = catalog.delete_admins(org.id).await.unwrap_err();
    assert!(matches!(err, ProvostError::Database(_)), "got: {err:?}");
    assert!(catalog.find_admin("owner@acme.com").await.unwrap().is_some());
}
