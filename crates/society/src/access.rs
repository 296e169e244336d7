//! Binary admin/resident role check.
//!
//! Identity is established upstream; requests arrive with the caller's role in
//! [`ROLE_HEADER`] and, for residents, their flat in [`FLAT_HEADER`].

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

pub const ROLE_HEADER: &str = "x-society-role";
pub const FLAT_HEADER: &str = "x-society-flat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Resident,
}

impl Role {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "resident" => Some(Self::Resident),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    pub flat: Option<String>,
}

impl Caller {
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            flat: None,
        }
    }

    pub fn resident(flat: impl Into<String>) -> Self {
        Self {
            role: Role::Resident,
            flat: Some(flat.into()),
        }
    }

    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Resident => Err(AccessDenied::AdminRequired),
        }
    }

    /// The only flat whose records this caller may list; `None` means every flat.
    pub fn visible_flat(&self) -> Option<&str> {
        match self.role {
            Role::Admin => None,
            Role::Resident => self.flat.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("missing x-society-role header")]
    MissingRole,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("residents must send x-society-flat")]
    MissingFlat,
    #[error("Admin access required")]
    AdminRequired,
}

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        let status = match self {
            AccessDenied::AdminRequired => StatusCode::FORBIDDEN,
            AccessDenied::MissingRole
            | AccessDenied::UnknownRole(_)
            | AccessDenied::MissingFlat => StatusCode::UNAUTHORIZED,
        };
        let payload = json!({ "success": false, "message": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AccessDenied;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_role = header(parts, ROLE_HEADER).ok_or(AccessDenied::MissingRole)?;
        let role =
            Role::parse(raw_role).ok_or_else(|| AccessDenied::UnknownRole(raw_role.to_string()))?;

        match role {
            Role::Admin => Ok(Caller::admin()),
            Role::Resident => header(parts, FLAT_HEADER)
                .map(Caller::resident)
                .ok_or(AccessDenied::MissingFlat),
        }
    }
}
