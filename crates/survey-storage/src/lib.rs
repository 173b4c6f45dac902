//! survey-storage - SQLite implementation of the survey store
//!
//! Connections are opened per operation on a blocking thread; WAL keeps
//! concurrent readers cheap and appends atomic.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use survey_core::{Answer, Poll, PollId, StoreError, StoreResult, SurveyStore, Tally, UserId};

#[derive(Debug, Clone)]
pub struct SqliteSurveyStore {
    db_path: PathBuf,
}

impl SqliteSurveyStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
        .map_err(|error| StoreError::Backend(error.to_string()))
    }
}

#[async_trait]
impl SurveyStore for SqliteSurveyStore {
    async fn init(&self) -> StoreResult<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS polls (
                    poll_id TEXT PRIMARY KEY,
                    question TEXT NOT NULL,
                    ordinal INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS poll_options (
                    poll_id TEXT NOT NULL,
                    option_index INTEGER NOT NULL,
                    label TEXT NOT NULL,
                    PRIMARY KEY (poll_id, option_index),
                    FOREIGN KEY(poll_id) REFERENCES polls(poll_id) ON DELETE CASCADE
                );

                CREATE TABLE IF NOT EXISTS answers (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    poll_id TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    option_index INTEGER NOT NULL,
                    run INTEGER NOT NULL,
                    answered_at TEXT NOT NULL,
                    FOREIGN KEY(poll_id) REFERENCES polls(poll_id)
                );

                CREATE INDEX IF NOT EXISTS idx_answers_poll ON answers(poll_id);
                CREATE INDEX IF NOT EXISTS idx_answers_user ON answers(user_id);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare("SELECT poll_id, question FROM polls ORDER BY ordinal ASC")?;
            let mut rows = stmt.query([])?;
            let mut polls = Vec::new();

            while let Some(row) = rows.next()? {
                let poll_id: String = row.get(0)?;
                let question: String = row.get(1)?;
                let options = load_options(connection, &poll_id)?;
                polls.push(Poll::new(poll_id, question, options));
            }

            Ok(polls)
        })
        .await
    }

    async fn seed_polls(&self, polls: &[Poll]) -> StoreResult<()> {
        let polls = polls.to_vec();
        self.with_connection(move |connection| {
            let next_ordinal: i64 = connection.query_row(
                "SELECT COALESCE(MAX(ordinal) + 1, 0) FROM polls",
                [],
                |row| row.get(0),
            )?;

            for (offset, poll) in polls.iter().enumerate() {
                connection.execute(
                    "INSERT INTO polls (poll_id, question, ordinal) VALUES (?1, ?2, ?3)",
                    params![poll.id.as_str(), poll.question, next_ordinal + offset as i64],
                )?;
                for (option_index, label) in poll.options.iter().enumerate() {
                    connection.execute(
                        "INSERT INTO poll_options (poll_id, option_index, label) VALUES (?1, ?2, ?3)",
                        params![poll.id.as_str(), option_index as i64, label],
                    )?;
                }
            }
            Ok(())
        })
        .await
    }

    async fn append_answer(&self, answer: &Answer) -> StoreResult<()> {
        let poll_id = answer.poll_id.as_str().to_string();
        let user_id = answer.user_id.0 as i64;
        let option_index = answer.option_index as i64;
        let run = i64::from(answer.run);
        let answered_at = format_timestamp(answer.answered_at);

        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO answers (poll_id, user_id, option_index, run, answered_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![poll_id, user_id, option_index, run, answered_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn runs_recorded(&self, user: UserId) -> StoreResult<u32> {
        let user_id = user.0 as i64;
        self.with_connection(move |connection| {
            let count: i64 = connection.query_row(
                "SELECT COUNT(DISTINCT run) FROM answers WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(count as u32)
        })
        .await
    }

    async fn tally(&self, poll: &PollId) -> StoreResult<Tally> {
        let poll_id = poll.as_str().to_string();
        self.with_connection(move |connection| {
            let mut stmt = connection.prepare(
                "SELECT option_index, COUNT(*) FROM answers WHERE poll_id = ?1 GROUP BY option_index",
            )?;
            let mut rows = stmt.query(params![poll_id])?;
            let mut tally = Tally::new();

            while let Some(row) = rows.next()? {
                let option_index: i64 = row.get(0)?;
                let count: i64 = row.get(1)?;
                tally.insert(option_index as usize, count as u64);
            }

            Ok(tally)
        })
        .await
    }

    async fn delete_all_answers(&self) -> StoreResult<u64> {
        self.with_connection(|connection| {
            let deleted = connection.execute("DELETE FROM answers", [])?;
            Ok(deleted as u64)
        })
        .await
    }
}

fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn load_options(connection: &Connection, poll_id: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = connection.prepare(
        "SELECT label FROM poll_options WHERE poll_id = ?1 ORDER BY option_index ASC",
    )?;
    let mut rows = stmt.query(params![poll_id])?;
    let mut options = Vec::new();

    while let Some(row) = rows.next()? {
        options.push(row.get(0)?);
    }

    Ok(options)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}
