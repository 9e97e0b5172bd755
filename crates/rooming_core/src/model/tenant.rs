//! Tenant records and tenant-centric read models.

use crate::model::assignment::AssignmentDetail;
use crate::model::transaction::TenantTransactionDetail;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type TenantId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List entry: tenant with its occupancy history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantOverview {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub assignments: Vec<AssignmentDetail>,
}

/// Detail view: occupancy history plus recorded payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,
    /// Newest `start_date` first.
    pub assignments: Vec<AssignmentDetail>,
    /// Newest `payment_date` first.
    pub payments: Vec<TenantTransactionDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub name: String,
    pub notes: Option<String>,
}

/// Validated partial update. `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
}

impl TenantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none()
    }
}
