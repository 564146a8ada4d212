use std::{
    collections::HashMap,
    error::Error,
    sync::{Arc, Mutex},
};

use super::{connection::StudentRegistry, student::StudentRecord};

/// Process-local registry, used where no database is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    students: Arc<Mutex<HashMap<i64, StudentRecord>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.lock().map(|s| s.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StudentRegistry for MemoryRegistry {
    async fn find_by_chat_id(
        &self,
        chat_id: i64,
    ) -> Result<Option<StudentRecord>, Box<dyn Error + Send + Sync>> {
        let students = self.students.lock().map_err(|e| e.to_string())?;
        Ok(students.get(&chat_id).cloned())
    }

    async fn create(
        &self,
        chat_id: i64,
        display_name: String,
    ) -> Result<StudentRecord, Box<dyn Error + Send + Sync>> {
        let mut students = self.students.lock().map_err(|e| e.to_string())?;
        if students.contains_key(&chat_id) {
            return Err(format!("student {chat_id} is already registered").into());
        }
        let record = StudentRecord::new(chat_id, display_name);
        students.insert(chat_id, record.clone());
        Ok(record)
    }
}
