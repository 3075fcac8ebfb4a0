//! HTTP route handlers.
//!
//! Thin layer over the lifecycle orchestrator: extract, delegate,
//! serialize. Authorization decisions live in the orchestrator, not
//! here — handlers only pull the raw bearer token off the request.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Form, Json, Router};
use chrono::{DateTime, Utc};
use provost_core::error::ProvostError;
use provost_core::models::organization::{CreateOrganization, Organization};
use provost_tenancy::lifecycle;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/admin/login", post(login))
        .route("/org/create", post(create_org))
        .route("/org/get", get(get_org))
        .route("/org/update", put(update_org))
        .route("/org/delete", delete(delete_org))
        .with_state(state)
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError(ProvostError::Auth {
                reason: "missing bearer token".into(),
            })
        })
}

#[derive(Serialize)]
struct OrganizationSummary {
    organization_name: String,
    organization_name_lower: String,
    admin_email: String,
    created_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationSummary {
    fn from(org: Organization) -> Self {
        Self {
            organization_name: org.organization_name,
            organization_name_lower: org.organization_name_lower,
            admin_email: org.admin_email,
            created_at: org.created_at,
        }
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    access_token: String,
    token_type: &'static str,
}

#[derive(Deserialize)]
struct OrgNameQuery {
    organization_name: String,
}

/// Update payload: the same credential fields as create plus the new
/// name. Credentials are validated for shape; authorization itself is
/// the bearer token.
#[derive(Deserialize)]
struct UpdateOrganizationRequest {
    organization_name: String,
    email: String,
    password: String,
    new_name: String,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if password.len() < lifecycle::MIN_PASSWORD_LEN {
        return Err(ApiError(ProvostError::Validation {
            message: format!(
                "password must be at least {} characters",
                lifecycle::MIN_PASSWORD_LEN
            ),
        }));
    }
    if !email.contains('@') {
        return Err(ApiError(ProvostError::Validation {
            message: "invalid email address".into(),
        }));
    }
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "env": state.env }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    let out = state.lifecycle.login(&form.username, &form.password).await?;
    Ok(Json(LoginResponse {
        access_token: out.access_token,
        token_type: out.token_type,
    }))
}

async fn create_org(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrganization>,
) -> Result<(StatusCode, Json<OrganizationSummary>), ApiError> {
    let org = state.lifecycle.create(payload).await?;
    Ok((StatusCode::CREATED, Json(org.into())))
}

async fn get_org(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrgNameQuery>,
) -> Result<Json<OrganizationSummary>, ApiError> {
    let org = state.lifecycle.get(&query.organization_name).await?;
    Ok(Json(org.into()))
}

async fn update_org(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationSummary>, ApiError> {
    let token = bearer_token(&headers)?;
    validate_credentials(&payload.email, &payload.password)?;
    let org = state
        .lifecycle
        .rename(token, &payload.organization_name, &payload.new_name)
        .await?;
    Ok(Json(org.into()))
}

async fn delete_org(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<OrgNameQuery>,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    state
        .lifecycle
        .delete(token, &query.organization_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer tok123".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "tok123");
    }

    #[test]
    fn update_payload_credentials_are_validated() {
        assert!(validate_credentials("owner@acme.com", "strongpassword123").is_ok());
        assert!(validate_credentials("not-an-email", "strongpassword123").is_err());
        assert!(validate_credentials("owner@acme.com", "short").is_err());
    }

    #[test]
    fn update_payload_carries_credential_fields() {
        let payload: UpdateOrganizationRequest = serde_json::from_value(json!({
            "organization_name": "Acme Corp",
            "email": "owner@acme.com",
            "password": "strongpassword123",
            "new_name": "Acme Industries",
        }))
        .unwrap();
        assert_eq!(payload.organization_name, "Acme Corp");
        assert_eq!(payload.email, "owner@acme.com");
        assert_eq!(payload.new_name, "Acme Industries");
    }
}
