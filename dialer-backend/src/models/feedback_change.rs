use serde::{Deserialize, Serialize};

/// Append-only audit record of one feedback update on a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackChange {
    pub id: i64,
    pub lead_id: i64,
    pub old_feedback: String,
    pub new_feedback: String,
    pub change_date: String,
}

/// One row of the exported change-history report: a change joined to the
/// lead's current name and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReportRow {
    pub lead_name: String,
    pub status: String,
    pub old_feedback: String,
    pub new_feedback: String,
    pub change_date: String,
}

impl FeedbackReportRow {
    /// Column headers, in export order.
    pub const HEADERS: [&'static str; 5] =
        ["Lead Name", "Status", "Old Feedback", "New Feedback", "Change Date"];

    /// Cell values, in the same order as [`Self::HEADERS`].
    pub fn cells(&self) -> [&str; 5] {
        [
            self.lead_name.as_str(),
            self.status.as_str(),
            self.old_feedback.as_str(),
            self.new_feedback.as_str(),
            self.change_date.as_str(),
        ]
    }
}
