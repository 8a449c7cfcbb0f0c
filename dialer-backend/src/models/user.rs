use serde::{Deserialize, Serialize};

/// Well-known role names. Roles are stored as free text, so these are the
/// values the app itself reads and writes rather than a closed set.
pub struct UserRole;

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TELECALLER: &'static str = "telecaller";
}

/// A person who can be assigned leads. There is no credential field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
}
