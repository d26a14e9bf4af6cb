//! Bearer-token identity
//!
//! Tokens are HS256 JWTs issued elsewhere in the portal. A token names either
//! a youth account or an SK officer; officers additionally carry their role
//! and, for barangay-level roles, the station they serve.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthConfig;
use crate::utils::errors::{PortalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Youth,
    Officer,
}

/// SK officer roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkRole {
    /// City-wide federation officer
    Federasyon,
    Chairman,
    Kagawad,
}

impl SkRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SkRole::Federasyon => "federasyon",
            SkRole::Chairman => "chairman",
            SkRole::Kagawad => "kagawad",
        }
    }
}

impl fmt::Display for SkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkRole {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federasyon" => Ok(SkRole::Federasyon),
            "chairman" => Ok(SkRole::Chairman),
            "kagawad" => Ok(SkRole::Kagawad),
            other => Err(PortalError::InvalidInput(format!("unknown SK role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub kind: PrincipalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk_role: Option<SkRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk_station: Option<String>,
    pub exp: i64,
}

/// Authenticated officer with barangay scoping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficerContext {
    pub officer_id: i64,
    pub role: SkRole,
    pub station: Option<String>,
}

impl OfficerContext {
    pub fn federasyon(officer_id: i64) -> Self {
        Self { officer_id, role: SkRole::Federasyon, station: None }
    }

    pub fn stationed(officer_id: i64, role: SkRole, station: impl Into<String>) -> Self {
        Self { officer_id, role, station: Some(station.into()) }
    }

    /// Federasyon may act anywhere; other roles only on their own station
    pub fn can_manage(&self, barangay: &str) -> bool {
        match self.role {
            SkRole::Federasyon => true,
            SkRole::Chairman | SkRole::Kagawad => self
                .station
                .as_deref()
                .map(|station| station.trim().eq_ignore_ascii_case(barangay.trim()))
                .unwrap_or(false),
        }
    }

    pub fn ensure_can_manage(&self, barangay: &str) -> Result<()> {
        if self.can_manage(barangay) {
            Ok(())
        } else {
            Err(PortalError::PermissionDenied(format!(
                "{} officers may only manage their own barangay, not '{barangay}'",
                self.role
            )))
        }
    }

    /// Barangay a station-bound officer is limited to
    pub fn station_scope(&self) -> Option<&str> {
        match self.role {
            SkRole::Federasyon => None,
            SkRole::Chairman | SkRole::Kagawad => self.station.as_deref(),
        }
    }
}

/// Identity resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Youth { account_id: i64 },
    Officer(OfficerContext),
}

impl TryFrom<Claims> for Principal {
    type Error = PortalError;

    fn try_from(claims: Claims) -> Result<Self> {
        match claims.kind {
            PrincipalKind::Youth => Ok(Principal::Youth { account_id: claims.sub }),
            PrincipalKind::Officer => {
                let role = claims
                    .sk_role
                    .ok_or_else(|| PortalError::Authentication("officer token without sk_role".to_string()))?;
                let station = claims.sk_station.filter(|s| !s.trim().is_empty());
                if role != SkRole::Federasyon && station.is_none() {
                    return Err(PortalError::Authentication(format!(
                        "{role} token without sk_station"
                    )));
                }
                Ok(Principal::Officer(OfficerContext { officer_id: claims.sub, role, station }))
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            token_ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    pub fn issue_youth_token(&self, account_id: i64) -> Result<String> {
        self.issue(Claims {
            sub: account_id,
            kind: PrincipalKind::Youth,
            sk_role: None,
            sk_station: None,
            exp: self.expiry(),
        })
    }

    pub fn issue_officer_token(&self, officer: &OfficerContext) -> Result<String> {
        self.issue(Claims {
            sub: officer.officer_id,
            kind: PrincipalKind::Officer,
            sk_role: Some(officer.role),
            sk_station: officer.station.clone(),
            exp: self.expiry(),
        })
    }

    pub fn issue(&self, claims: Claims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        debug!(sub = data.claims.sub, kind = ?data.claims.kind, "Bearer token verified");
        Ok(data.claims)
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal> {
        Principal::try_from(self.decode(token)?)
    }

    fn expiry(&self) -> i64 {
        (Utc::now() + self.token_ttl).timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: "a-test-secret-that-is-long-enough-123".to_string(),
            token_ttl_minutes: 5,
        })
    }

    #[test]
    fn youth_token_round_trips() {
        let auth = service();
        let token = auth.issue_youth_token(42).unwrap();
        assert_eq!(auth.authenticate(&token).unwrap(), Principal::Youth { account_id: 42 });
    }

    #[test]
    fn officer_token_keeps_station() {
        let auth = service();
        let officer = OfficerContext::stationed(7, SkRole::Chairman, "Poblacion");
        let token = auth.issue_officer_token(&officer).unwrap();
        assert_eq!(auth.authenticate(&token).unwrap(), Principal::Officer(officer));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service();
        let token = auth
            .issue(Claims {
                sub: 1,
                kind: PrincipalKind::Youth,
                sk_role: None,
                sk_station: None,
                exp: (Utc::now() - Duration::hours(1)).timestamp(),
            })
            .unwrap();
        assert_matches!(auth.authenticate(&token), Err(PortalError::Token(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "another-secret-of-sufficient-length-456".to_string(),
            token_ttl_minutes: 5,
        });
        let token = other.issue_youth_token(1).unwrap();
        assert!(service().authenticate(&token).is_err());
    }

    #[test]
    fn kagawad_token_needs_station() {
        let claims = Claims {
            sub: 3,
            kind: PrincipalKind::Officer,
            sk_role: Some(SkRole::Kagawad),
            sk_station: Some("  ".to_string()),
            exp: 0,
        };
        assert_matches!(Principal::try_from(claims), Err(PortalError::Authentication(_)));
    }

    #[test]
    fn barangay_scoping() {
        let federasyon = OfficerContext::federasyon(1);
        assert!(federasyon.can_manage("San Isidro"));
        assert_eq!(federasyon.station_scope(), None);

        let chairman = OfficerContext::stationed(2, SkRole::Chairman, "Poblacion");
        assert!(chairman.can_manage("poblacion "));
        assert_matches!(chairman.ensure_can_manage("San Isidro"), Err(PortalError::PermissionDenied(_)));
        assert_eq!(chairman.station_scope(), Some("Poblacion"));
    }
}
