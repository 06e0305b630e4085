use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::permits::repo_types::PermitApplicationRow;

/// Request body for a new permit application.
#[derive(Debug, Deserialize)]
pub struct PermitApplicationCreate {
    pub permit_type: String,
}

/// Permit application as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermitApplication {
    pub id: i64,
    pub user_id: Option<i64>,
    pub permit_type: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PermitApplicationRow> for PermitApplication {
    fn from(r: PermitApplicationRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            permit_type: r.permit_type,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
