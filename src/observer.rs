use teloxide::types::ChatId;

use crate::controller::{Event, Inbound, Reply};

/// Side channel run after every dispatched event, independent of quiz state.
pub trait MessageObserver: Send + Sync {
    fn observe(&self, inbound: &Inbound) -> Option<Reply>;
}

/// Forwards every plain (non-command) text message to the teacher.
#[derive(Debug, Clone)]
pub struct TeacherMirror {
    teacher: Option<ChatId>,
}

impl TeacherMirror {
    pub fn new(teacher: Option<ChatId>) -> Self {
        Self { teacher }
    }
}

impl MessageObserver for TeacherMirror {
    fn observe(&self, inbound: &Inbound) -> Option<Reply> {
        let teacher = self.teacher?;
        let Event::Text(text) = &inbound.event else {
            return None;
        };

        log::debug!("Mirroring message from {} to teacher", inbound.chat_id.0);
        Some(Reply::new(
            teacher,
            format!(
                "{}: message from {}: {}",
                inbound.chat_id.0, inbound.sender_name, text
            ),
        ))
    }
}
