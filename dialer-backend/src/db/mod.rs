//! SQLite storage for users, leads, and the feedback change history.

mod sqlite;
mod tables;

pub use sqlite::{Database, DbConnection, DbError, Result};

#[cfg(test)]
pub(crate) use sqlite::test_support;
