pub mod feedback_change;
pub mod lead;
pub mod user;

pub use feedback_change::{FeedbackChange, FeedbackReportRow};
pub use lead::{Lead, LeadStatus};
pub use user::{User, UserRole};
