//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table group.

mod feedback_changes; // feedback_changes (append-only history + report join)
mod leads;            // leads
mod users;            // users
