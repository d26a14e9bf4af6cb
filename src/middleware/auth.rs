//! Bearer-token extractors
//!
//! Handlers take `CurrentYouth`, `CurrentOfficer` or `MaybePrincipal` and receive
//! the resolved identity; services never read it from ambient state.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::services::auth::{OfficerContext, Principal};
use crate::state::AppState;
use crate::utils::errors::{PortalError, Result};

/// Authenticated youth account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentYouth(pub i64);

/// Authenticated SK officer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentOfficer(pub OfficerContext);

/// Principal when a valid token is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybePrincipal(pub Option<Principal>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| PortalError::Authentication("malformed authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PortalError::Authentication("expected a bearer token".to_string()))?;
    Ok(Some(token))
}

fn principal(parts: &Parts, state: &AppState) -> Result<Principal> {
    let token = bearer_token(parts)?
        .ok_or_else(|| PortalError::Authentication("missing bearer token".to_string()))?;
    state.services.auth_service.authenticate(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentYouth {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match principal(parts, state)? {
            Principal::Youth { account_id } => Ok(CurrentYouth(account_id)),
            Principal::Officer(officer) => {
                debug!(officer_id = officer.officer_id, path = %parts.uri.path(), "Officer token on youth route");
                Err(PortalError::PermissionDenied("this action is for youth accounts".to_string()))
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentOfficer {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match principal(parts, state)? {
            Principal::Officer(officer) => Ok(CurrentOfficer(officer)),
            Principal::Youth { account_id } => {
                debug!(account_id = account_id, path = %parts.uri.path(), "Youth token on officer route");
                Err(PortalError::PermissionDenied("SK officer privileges required".to_string()))
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = PortalError;

    /// No header means anonymous; a present but invalid token is still rejected
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match bearer_token(parts)? {
            None => Ok(MaybePrincipal(None)),
            Some(token) => Ok(MaybePrincipal(Some(state.services.auth_service.authenticate(token)?))),
        }
    }
}
