use std::{borrow::Cow, error::Error, future::Future};

use sqlx::postgres::PgPool;
use tracing::instrument;

use super::student::StudentRecord;

type GenericError<T> = Result<T, Box<dyn Error + Send + Sync>>;

pub struct Connection {
    pool: PgPool,
}

impl Connection {
    pub async fn connect<'a>(connection_string: Cow<'a, str>) -> GenericError<Self> {
        let pool = PgPool::connect(&connection_string).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> GenericError<()> {
        log::debug!("Running database migrations");
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

/// Lookup and creation of student registrations, keyed by chat id.
pub trait StudentRegistry: Send + Sync {
    fn find_by_chat_id(
        &self,
        chat_id: i64,
    ) -> impl Future<Output = GenericError<Option<StudentRecord>>> + Send;

    fn create(
        &self,
        chat_id: i64,
        display_name: String,
    ) -> impl Future<Output = GenericError<StudentRecord>> + Send;
}

impl StudentRegistry for Connection {
    #[instrument(level = "debug", skip(self))]
    async fn find_by_chat_id(&self, chat_id: i64) -> GenericError<Option<StudentRecord>> {
        let student = sqlx::query_as::<_, StudentRecord>(
            "SELECT uuid, chat_id, display_name, created_at FROM students WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    #[instrument(level = "debug", skip(self))]
    async fn create(&self, chat_id: i64, display_name: String) -> GenericError<StudentRecord> {
        let record = StudentRecord::new(chat_id, display_name);

        log::debug!("Adding student {}", record);
        let student = sqlx::query_as::<_, StudentRecord>(
            "INSERT INTO students (uuid, chat_id, display_name, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING uuid, chat_id, display_name, created_at",
        )
        .bind(record.uuid())
        .bind(record.chat_id())
        .bind(record.display_name())
        .bind(record.created_at())
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }
}
