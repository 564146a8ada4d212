use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::{InMemStorage, InMemStorageError, Storage},
    types::ChatId,
};

use super::{
    question::Question,
    session::{GradeOutcome, Session},
};

type StoreResult<T> = Result<T, InMemStorageError>;

/// Quiz sessions keyed by chat, kept in teloxide's in-memory dialogue storage.
/// Lost on restart.
///
/// Reads and writes for one chat are not locked together; the dispatcher
/// delivers a chat's updates one at a time.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<InMemStorage<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_storage(InMemStorage::new())
    }

    pub fn with_storage(storage: Arc<InMemStorage<Session>>) -> Self {
        Self { storage }
    }

    /// Seeds a fresh session, replacing any running one, and returns its first question.
    pub async fn start_session(&self, chat_id: ChatId) -> StoreResult<Question> {
        let session = Session::random(chat_id);
        let first = session.questions()[0].clone();
        self.insert(session).await?;
        Ok(first)
    }

    pub async fn insert(&self, session: Session) -> StoreResult<()> {
        self.storage
            .clone()
            .update_dialogue(session.chat_id(), session)
            .await
    }

    pub async fn get(&self, chat_id: ChatId) -> StoreResult<Option<Session>> {
        self.storage.clone().get_dialogue(chat_id).await
    }

    pub async fn contains(&self, chat_id: ChatId) -> StoreResult<bool> {
        Ok(self.get(chat_id).await?.is_some())
    }

    /// Drops the chat's session, returning it if there was one.
    pub async fn remove(&self, chat_id: ChatId) -> StoreResult<Option<Session>> {
        let Some(session) = self.get(chat_id).await? else {
            return Ok(None);
        };
        self.storage.clone().remove_dialogue(chat_id).await?;
        Ok(Some(session))
    }

    /// Grades `raw` against the chat's session, dropping the session once its
    /// last question is answered. `None` if the chat has no session.
    pub async fn grade(&self, chat_id: ChatId, raw: &str) -> StoreResult<Option<GradeOutcome>> {
        let Some(mut session) = self.get(chat_id).await? else {
            return Ok(None);
        };
        let Some(outcome) = session.grade(raw) else {
            self.remove(chat_id).await?;
            return Ok(None);
        };

        if outcome.is_finished() {
            self.storage.clone().remove_dialogue(chat_id).await?;
        } else {
            self.insert(session).await?;
        }

        Ok(Some(outcome))
    }
}
