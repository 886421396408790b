//! Category catalog domain models.

use serde::{Deserialize, Serialize};

/// Domain model for a day-to-day spending category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}
