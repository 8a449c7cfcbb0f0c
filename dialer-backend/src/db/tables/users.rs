//! User database operations

use rusqlite::Row;

use super::super::{Database, Result};
use crate::models::User;

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

impl Database {
    /// Insert a user and return it. Fails on a duplicate username.
    pub fn create_user(&self, username: &str, role: &str) -> Result<User> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (username, role) VALUES (?1, ?2)",
            [username, role],
        )?;
        let id = conn.last_insert_rowid();
        Ok(User {
            id,
            username: username.to_string(),
            role: role.to_string(),
        })
    }

    /// Insert each username with `role` unless it already exists.
    /// Returns how many users were newly created.
    pub fn seed_users(&self, usernames: &[String], role: &str) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut created = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO users (username, role) VALUES (?1, ?2)")?;
            for username in usernames {
                created += stmt.execute([username.as_str(), role])?;
            }
        }
        tx.commit()?;
        Ok(created)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, username, role FROM users WHERE username = ?1",
            [username],
            row_to_user,
        );
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All users with exactly this role, in id order.
    pub fn list_users_by_role(&self, role: &str) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, username, role FROM users WHERE role = ?1 ORDER BY id")?;
        let users = stmt
            .query_map([role], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::models::UserRole;

    #[test]
    fn test_create_and_lookup_user() {
        let (_dir, db) = temp_db();
        let alice = db.create_user("alice", UserRole::TELECALLER).unwrap();

        let by_name = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name, alice);
        assert_eq!(by_name.role, "telecaller");

        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_dir, db) = temp_db();
        db.create_user("alice", UserRole::TELECALLER).unwrap();
        assert!(db.create_user("alice", UserRole::ADMIN).is_err());
    }

    #[test]
    fn test_seed_users_is_idempotent() {
        let (_dir, db) = temp_db();
        let names = vec!["alice".to_string(), "bob".to_string()];

        assert_eq!(db.seed_users(&names, UserRole::TELECALLER).unwrap(), 2);
        assert_eq!(db.seed_users(&names, UserRole::TELECALLER).unwrap(), 0);

        let telecallers = db.list_users_by_role(UserRole::TELECALLER).unwrap();
        let usernames: Vec<&str> = telecallers.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(usernames, vec!["alice", "bob"]);
    }

    #[test]
    fn test_list_users_by_role_excludes_admin() {
        let (_dir, db) = temp_db();
        assert!(db.list_users_by_role(UserRole::TELECALLER).unwrap().is_empty());

        db.create_user("carol", UserRole::TELECALLER).unwrap();
        let telecallers = db.list_users_by_role(UserRole::TELECALLER).unwrap();
        assert_eq!(telecallers.len(), 1);
        assert_eq!(telecallers[0].username, "carol");

        let admins = db.list_users_by_role(UserRole::ADMIN).unwrap();
        assert_eq!(admins.len(), 1);
    }
}
