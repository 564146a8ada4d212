use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered student. Created on first `/start`, never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StudentRecord {
    uuid: Uuid,
    chat_id: i64,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl StudentRecord {
    pub fn new(chat_id: i64, display_name: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            chat_id,
            display_name,
            created_at: Utc::now(),
        }
    }

    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.chat_id)
    }
}
