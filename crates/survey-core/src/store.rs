//! Survey store trait and in-memory implementation
//!
//! The store owns the poll catalog and every recorded answer. Business
//! rules (run numbering, duplicate gating) live in the controller; the
//! store is pure data access.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::poll::{Answer, Poll, PollId, Tally, UserId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent storage of the poll catalog and recorded answers.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Prepare the backing storage (create tables, directories, ...).
    async fn init(&self) -> StoreResult<()>;

    /// The full poll catalog in its stable, seeded order.
    async fn list_polls(&self) -> StoreResult<Vec<Poll>>;

    /// Administrative seeding: append polls to the catalog in the given
    /// order. The caller decides when seeding is appropriate (normally
    /// only into an empty catalog); polls are never deleted.
    async fn seed_polls(&self, polls: &[Poll]) -> StoreResult<()>;

    /// Append one answer row.
    async fn append_answer(&self, answer: &Answer) -> StoreResult<()>;

    /// Count of distinct run numbers the user has recorded at least one
    /// answer for.
    async fn runs_recorded(&self, user: UserId) -> StoreResult<u32>;

    /// Vote counts per option index for one poll, across all runs and
    /// users. Options nobody voted for are absent from the map.
    async fn tally(&self, poll: &PollId) -> StoreResult<Tally>;

    /// Delete every answer row for every user. Returns the number of
    /// rows removed. The poll catalog is untouched.
    async fn delete_all_answers(&self) -> StoreResult<u64>;
}

/// In-memory store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemorySurveyStore {
    polls: Arc<RwLock<Vec<Poll>>>,
    answers: Arc<RwLock<Vec<Answer>>>,
}

impl MemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded answer, in append order.
    pub async fn answers(&self) -> Vec<Answer> {
        self.answers.read().await.clone()
    }
}

#[async_trait]
impl SurveyStore for MemorySurveyStore {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        Ok(self.polls.read().await.clone())
    }

    async fn seed_polls(&self, polls: &[Poll]) -> StoreResult<()> {
        self.polls.write().await.extend_from_slice(polls);
        Ok(())
    }

    async fn append_answer(&self, answer: &Answer) -> StoreResult<()> {
        self.answers.write().await.push(answer.clone());
        Ok(())
    }

    async fn runs_recorded(&self, user: UserId) -> StoreResult<u32> {
        let answers = self.answers.read().await;
        let mut runs: Vec<u32> = answers
            .iter()
            .filter(|answer| answer.user_id == user)
            .map(|answer| answer.run)
            .collect();
        runs.sort_unstable();
        runs.dedup();
        Ok(runs.len() as u32)
    }

    async fn tally(&self, poll: &PollId) -> StoreResult<Tally> {
        let answers = self.answers.read().await;
        let mut tally = Tally::new();
        for answer in answers.iter().filter(|answer| &answer.poll_id == poll) {
            *tally.entry(answer.option_index).or_insert(0) += 1;
        }
        Ok(tally)
    }

    async fn delete_all_answers(&self) -> StoreResult<u64> {
        let mut answers = self.answers.write().await;
        let removed = answers.len() as u64;
        answers.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn answer(poll: &str, user: u64, option: usize, run: u32) -> Answer {
        Answer {
            poll_id: PollId::from(poll),
            user_id: UserId(user),
            option_index: option,
            run,
            answered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn seeding_preserves_catalog_order() {
        let store = MemorySurveyStore::new();
        store
            .seed_polls(&[
                Poll::new("b", "Second?", vec!["x".into(), "y".into()]),
                Poll::new("a", "First?", vec!["x".into(), "y".into()]),
            ])
            .await
            .unwrap();

        let polls = store.list_polls().await.unwrap();
        assert_eq!(polls[0].id, PollId::from("b"));
        assert_eq!(polls[1].id, PollId::from("a"));
    }

    #[tokio::test]
    async fn runs_recorded_counts_distinct_runs_per_user() {
        let store = MemorySurveyStore::new();
        store.append_answer(&answer("p", 1, 0, 1)).await.unwrap();
        store.append_answer(&answer("q", 1, 1, 1)).await.unwrap();
        store.append_answer(&answer("p", 1, 0, 2)).await.unwrap();
        store.append_answer(&answer("p", 2, 0, 1)).await.unwrap();

        assert_eq!(store.runs_recorded(UserId(1)).await.unwrap(), 2);
        assert_eq!(store.runs_recorded(UserId(2)).await.unwrap(), 1);
        assert_eq!(store.runs_recorded(UserId(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn tally_aggregates_across_runs_and_users() {
        let store = MemorySurveyStore::new();
        store.append_answer(&answer("p", 1, 0, 1)).await.unwrap();
        store.append_answer(&answer("p", 1, 0, 2)).await.unwrap();
        store.append_answer(&answer("p", 2, 1, 1)).await.unwrap();
        store.append_answer(&answer("q", 2, 1, 1)).await.unwrap();

        let tally = store.tally(&PollId::from("p")).await.unwrap();
        assert_eq!(tally.get(&0), Some(&2));
        assert_eq!(tally.get(&1), Some(&1));
        assert_eq!(tally.len(), 2);
    }

    #[tokio::test]
    async fn delete_all_answers_reports_the_removed_count() {
        let store = MemorySurveyStore::new();
        store.append_answer(&answer("p", 1, 0, 1)).await.unwrap();
        store.append_answer(&answer("q", 2, 1, 1)).await.unwrap();

        assert_eq!(store.delete_all_answers().await.unwrap(), 2);
        assert!(store.tally(&PollId::from("p")).await.unwrap().is_empty());
        assert_eq!(store.runs_recorded(UserId(1)).await.unwrap(), 0);
    }
}
