use crate::adapters::database::case_worker_repo::CaseWorkerRepository;
use crate::adapters::database::records::{ContactRecord, ConversationSummaryRecord, MessageRecord};
use crate::adapters::database::{DbPool, is_foreign_key_violation};
use crate::domain::conversation::ConversationId;
use crate::domain::message::{Contact, ConversationSummary, Message, NewMessage, PageRequest};
use crate::error::{AppError, Result};
use crate::services::message_service::MessageStore;
use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default)]
pub struct MessageRepository {}

impl MessageRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::NotFound` if the receiver, case worker or parent message does not exist.
    #[tracing::instrument(level = "debug", skip(self, conn, message), fields(sender_id = message.sender_id))]
    pub(crate) async fn create(&self, conn: &mut PgConnection, message: &NewMessage) -> Result<Message> {
        let result = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, case_worker_id, conversation_id, content, parent_message_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                      parent_message_id, created_at
            "#,
        )
        .bind(message.sender_id)
        .bind(message.receiver_id())
        .bind(message.case_worker_id())
        .bind(message.conversation_id())
        .bind(&message.content)
        .bind(message.parent_message_id)
        .fetch_one(conn)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::NotFound),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                   parent_message_id, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Returns one page of a peer conversation in ascending creation order.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn fetch_conversation(
        &self,
        conn: &mut PgConnection,
        conversation_id: &str,
        page: PageRequest,
    ) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                   parent_message_id, created_at
            FROM messages
            WHERE conversation_id = $1
              AND ($2::bigint IS NULL OR (created_at, id) < (SELECT created_at, id FROM messages WHERE id = $2 AND conversation_id = $1))
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(conversation_id)
        .bind(page.before)
        .bind(page.limit)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().rev().map(Into::into).collect())
    }

    /// Case worker thread rows, optionally narrowed to the rows a single user sent or received.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn fetch_case_worker_thread(
        &self,
        conn: &mut PgConnection,
        case_worker_id: i64,
        participant_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                   parent_message_id, created_at
            FROM messages
            WHERE case_worker_id = $1
              AND ($2::bigint IS NULL OR sender_id = $2 OR receiver_id = $2)
              AND ($3::bigint IS NULL OR (created_at, id) < (SELECT created_at, id FROM messages WHERE id = $3 AND case_worker_id = $1))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(case_worker_id)
        .bind(participant_id)
        .bind(page.before)
        .bind(page.limit)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().rev().map(Into::into).collect())
    }

    /// Latest message of every peer conversation the user takes part in, newest first.
    ///
    /// Membership is read from the conversation key so rows whose sender was
    /// deleted still count.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn fetch_conversations(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>> {
        let records = sqlx::query_as::<_, ConversationSummaryRecord>(
            r#"
            SELECT latest.*,
                   (SELECT COUNT(*)
                    FROM messages u
                    WHERE u.conversation_id = latest.conversation_id
                      AND u.receiver_id = $1
                      AND NOT u.is_read) AS unread_count
            FROM (
                SELECT DISTINCT ON (conversation_id)
                       id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                       parent_message_id, created_at
                FROM messages
                WHERE conversation_id IS NOT NULL
                  AND (split_part(conversation_id, '-', 1)::bigint = $1
                       OR split_part(conversation_id, '-', 2)::bigint = $1)
                ORDER BY conversation_id, created_at DESC, id DESC
            ) latest
            ORDER BY latest.created_at DESC, latest.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let message: Message = record.message.into();
                let conversation_id = parse_key(&message)?;
                let other_user_id = conversation_id.other(user_id)?;
                Some(ConversationSummary {
                    conversation_id,
                    other_user_id,
                    last_message: message,
                    unread_count: record.unread_count,
                })
            })
            .collect())
    }

    /// Latest message per conversation joined with the other participant's display name, newest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn fetch_contacts(&self, conn: &mut PgConnection, user_id: i64) -> Result<Vec<Contact>> {
        let records = sqlx::query_as::<_, ContactRecord>(
            r#"
            SELECT latest.id, latest.sender_id, latest.receiver_id, latest.case_worker_id, latest.conversation_id,
                   latest.content, latest.is_read, latest.read_at, latest.parent_message_id, latest.created_at,
                   u.id AS contact_id, u.display_name AS contact_display_name
            FROM (
                SELECT DISTINCT ON (conversation_id)
                       id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                       parent_message_id, created_at,
                       CASE WHEN split_part(conversation_id, '-', 1)::bigint = $1
                            THEN split_part(conversation_id, '-', 2)::bigint
                            ELSE split_part(conversation_id, '-', 1)::bigint
                       END AS other_id
                FROM messages
                WHERE conversation_id IS NOT NULL
                  AND (split_part(conversation_id, '-', 1)::bigint = $1
                       OR split_part(conversation_id, '-', 2)::bigint = $1)
                ORDER BY conversation_id, created_at DESC, id DESC
            ) latest
            JOIN users u ON u.id = latest.other_id
            ORDER BY latest.created_at DESC, latest.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(records
            .into_iter()
            .map(|record| Contact {
                user_id: record.contact_id,
                display_name: record.contact_display_name,
                last_message: record.message.into(),
            })
            .collect())
    }

    /// Sets the read flag. `read_at` is only ever filled in, never moved.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the update fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn set_read(
        &self,
        conn: &mut PgConnection,
        id: i64,
        is_read: bool,
        now: OffsetDateTime,
    ) -> Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            UPDATE messages
            SET is_read = $2,
                read_at = COALESCE(read_at, CASE WHEN $2 THEN $3::timestamptz END)
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, case_worker_id, conversation_id, content, is_read, read_at,
                      parent_message_id, created_at
            "#,
        )
        .bind(id)
        .bind(is_read)
        .bind(now)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn parse_key(message: &Message) -> Option<ConversationId> {
    let raw = message.conversation_id.as_deref()?;
    match raw.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(message_id = message.id, conversation_id = %raw, error = %e, "Skipping malformed conversation key");
            None
        }
    }
}

/// Postgres-backed [`MessageStore`].
#[derive(Clone, Debug)]
pub struct PgMessageStore {
    pool: DbPool,
    repo: MessageRepository,
    case_worker_repo: CaseWorkerRepository,
}

impl PgMessageStore {
    #[must_use]
    pub const fn new(pool: DbPool, repo: MessageRepository, case_worker_repo: CaseWorkerRepository) -> Self {
        Self { pool, repo, case_worker_repo }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(&self, message: &NewMessage) -> Result<Message> {
        let mut conn = self.pool.acquire().await?;
        self.repo.create(&mut conn, message).await
    }

    async fn find(&self, id: i64) -> Result<Option<Message>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.find_by_id(&mut conn, id).await
    }

    async fn conversation(&self, conversation_id: &ConversationId, page: PageRequest) -> Result<Vec<Message>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.fetch_conversation(&mut conn, &conversation_id.to_string(), page).await
    }

    async fn case_worker_thread(
        &self,
        case_worker_id: i64,
        participant_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<Message>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.fetch_case_worker_thread(&mut conn, case_worker_id, participant_id, page).await
    }

    async fn conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.fetch_conversations(&mut conn, user_id).await
    }

    async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.fetch_contacts(&mut conn, user_id).await
    }

    async fn set_read(&self, id: i64, is_read: bool, now: OffsetDateTime) -> Result<Option<Message>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.set_read(&mut conn, id, is_read, now).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        self.repo.delete(&mut conn, id).await
    }

    async fn case_worker_user(&self, case_worker_id: i64) -> Result<Option<Option<i64>>> {
        let mut conn = self.pool.acquire().await?;
        let worker = self.case_worker_repo.find_by_id(&mut conn, case_worker_id).await?;
        Ok(worker.map(|w| w.details.user_id))
    }
}
