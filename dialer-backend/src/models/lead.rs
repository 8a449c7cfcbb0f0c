use serde::{Deserialize, Serialize};

/// Status values written by the lead handlers. Stored as free text.
pub struct LeadStatus;

impl LeadStatus {
    pub const NEW: &'static str = "New";
    pub const UPDATED: &'static str = "Updated";
}

/// A contact record assigned to a telecaller for follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub lead_name: String,
    /// May be NULL in database files written before references were checked
    pub assigned_to: Option<i64>,
    pub status: String,
    /// Current feedback; equals the newest change's `new_feedback`
    pub feedback: String,
    /// RFC 3339 timestamp of the last mutation
    pub updated_at: String,
}
