//! Feedback change history (append-only; rows are written by `update_lead_feedback`)

use rusqlite::Row;

use super::super::{Database, Result};
use crate::models::{FeedbackChange, FeedbackReportRow};

fn text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

impl Database {
    /// History for one lead, oldest first.
    pub fn list_feedback_changes(&self, lead_id: i64) -> Result<Vec<FeedbackChange>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, old_feedback, new_feedback, change_date
             FROM feedback_changes WHERE lead_id = ?1 ORDER BY id",
        )?;
        let changes = stmt
            .query_map([lead_id], |row| {
                Ok(FeedbackChange {
                    id: row.get(0)?,
                    lead_id: row.get(1)?,
                    old_feedback: text(row, 2)?,
                    new_feedback: text(row, 3)?,
                    change_date: text(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(changes)
    }

    /// Every recorded change joined to its lead's current name and status.
    /// Leads that were never updated do not appear.
    pub fn feedback_report_rows(&self) -> Result<Vec<FeedbackReportRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT l.lead_name, l.status, fc.old_feedback, fc.new_feedback, fc.change_date
             FROM feedback_changes fc
             JOIN leads l ON fc.lead_id = l.id
             ORDER BY fc.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FeedbackReportRow {
                    lead_name: text(row, 0)?,
                    status: text(row, 1)?,
                    old_feedback: text(row, 2)?,
                    new_feedback: text(row, 3)?,
                    change_date: text(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::models::UserRole;

    #[test]
    fn test_report_rows_empty() {
        let (_dir, db) = temp_db();
        let alice = db.create_user("alice", UserRole::TELECALLER).unwrap();
        db.create_lead("Never touched", alice.id).unwrap();

        assert!(db.feedback_report_rows().unwrap().is_empty());
    }

    #[test]
    fn test_report_rows_join_current_lead_state() {
        let (_dir, db) = temp_db();
        let alice = db.create_user("alice", UserRole::TELECALLER).unwrap();
        let lead = db.create_lead("Acme", alice.id).unwrap();
        db.create_lead("Untouched", alice.id).unwrap();

        db.update_lead_feedback(lead.id, "Busy").unwrap();
        db.update_lead_feedback(lead.id, "Interested").unwrap();

        let rows = db.feedback_report_rows().unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.lead_name, "Acme");
            assert_eq!(row.status, "Updated");
        }
        assert_eq!((rows[0].old_feedback.as_str(), rows[0].new_feedback.as_str()), ("", "Busy"));
        assert_eq!(
            (rows[1].old_feedback.as_str(), rows[1].new_feedback.as_str()),
            ("Busy", "Interested")
        );
    }

    #[test]
    fn test_history_is_per_lead() {
        let (_dir, db) = temp_db();
        let alice = db.create_user("alice", UserRole::TELECALLER).unwrap();
        let a = db.create_lead("A", alice.id).unwrap();
        let b = db.create_lead("B", alice.id).unwrap();

        db.update_lead_feedback(a.id, "one").unwrap();
        db.update_lead_feedback(b.id, "two").unwrap();
        db.update_lead_feedback(a.id, "three").unwrap();

        assert_eq!(db.list_feedback_changes(a.id).unwrap().len(), 2);
        assert_eq!(db.list_feedback_changes(b.id).unwrap().len(), 1);
        assert!(db.list_feedback_changes(999).unwrap().is_empty());
    }
}
