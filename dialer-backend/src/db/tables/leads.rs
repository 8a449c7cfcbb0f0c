//! Lead database operations, including the transactional feedback update

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, TransactionBehavior};

use super::super::{Database, DbError, Result};
use crate::models::{FeedbackChange, Lead, LeadStatus};

const LEAD_COLUMNS: &str = "id, lead_name, assigned_to, status, feedback, updated_at";

// Text columns are read as nullable: files created by older builds of the
// app declared them without NOT NULL.
fn row_to_lead(row: &Row) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        lead_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        assigned_to: row.get(2)?,
        status: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        feedback: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        updated_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

// A rejected `leads.assigned_to` foreign key means the assignee is gone.
fn assignee_error(err: rusqlite::Error, assigned_to: i64) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            DbError::UnknownAssignee(assigned_to)
        }
        other => other.into(),
    }
}

impl Database {
    /// Create a lead with status "New" and empty feedback.
    /// `assigned_to` must name an existing user.
    pub fn create_lead(&self, lead_name: &str, assigned_to: i64) -> Result<Lead> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let assignee_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            [assigned_to],
            |row| row.get(0),
        )?;
        if !assignee_exists {
            return Err(DbError::UnknownAssignee(assigned_to));
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO leads (lead_name, assigned_to, status, feedback, updated_at)
             VALUES (?1, ?2, ?3, '', ?4)",
            rusqlite::params![lead_name, assigned_to, LeadStatus::NEW, now],
        )
        .map_err(|e| assignee_error(e, assigned_to))?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        Ok(Lead {
            id,
            lead_name: lead_name.to_string(),
            assigned_to: Some(assigned_to),
            status: LeadStatus::NEW.to_string(),
            feedback: String::new(),
            updated_at: now,
        })
    }

    pub fn get_lead(&self, id: i64) -> Result<Option<Lead>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS);
        let result = conn.query_row(&sql, [id], row_to_lead);
        match result {
            Ok(lead) => Ok(Some(lead)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Every lead, in storage order.
    pub fn list_leads(&self) -> Result<Vec<Lead>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM leads ORDER BY id", LEAD_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let leads = stmt
            .query_map([], row_to_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    pub fn list_leads_assigned_to(&self, user_id: i64) -> Result<Vec<Lead>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM leads WHERE assigned_to = ?1 ORDER BY id", LEAD_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let leads = stmt
            .query_map([user_id], row_to_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    /// Leads assigned to the named user. Unknown usernames are an error, a
    /// known user with nothing assigned gets an empty list.
    pub fn list_leads_for_username(&self, username: &str) -> Result<Vec<Lead>> {
        let user = self
            .get_user_by_username(username)?
            .ok_or_else(|| DbError::UserNotFound(username.to_string()))?;
        self.list_leads_assigned_to(user.id)
    }

    /// Overwrite a lead's feedback, mark it "Updated", and append the matching
    /// history row. Both writes commit together or not at all.
    ///
    /// The transaction is IMMEDIATE so the write lock is held before the old
    /// feedback is read; concurrent updates to one lead serialize.
    pub fn update_lead_feedback(&self, lead_id: i64, new_feedback: &str) -> Result<FeedbackChange> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let old_feedback: Option<String> = tx
            .query_row("SELECT feedback FROM leads WHERE id = ?1", [lead_id], |row| row.get(0))
            .optional()?
            .ok_or(DbError::LeadNotFound(lead_id))?;
        let old_feedback = old_feedback.unwrap_or_default();

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "UPDATE leads SET feedback = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![new_feedback, LeadStatus::UPDATED, now, lead_id],
        )?;
        tx.execute(
            "INSERT INTO feedback_changes (lead_id, old_feedback, new_feedback, change_date)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![lead_id, old_feedback, new_feedback, now],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        Ok(FeedbackChange {
            id,
            lead_id,
            old_feedback,
            new_feedback: new_feedback.to_string(),
            change_date: now,
        })
    }
}
