//! Answer recorder
//!
//! Thin domain service over the store: appends run-tagged answer rows and
//! derives run counts and tallies. Duplicate suppression is deliberately
//! not done here; the controller's position tracking is the only gate.

use std::sync::Arc;

use chrono::Utc;

use crate::poll::{Answer, PollId, Tally, UserId};
use crate::store::{StoreResult, SurveyStore};

#[derive(Debug)]
pub struct AnswerRecorder<S> {
    store: Arc<S>,
}

impl<S> Clone for AnswerRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SurveyStore> AnswerRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append one answer row per selected option, all tagged with `run`.
    /// Multi-select answers produce several rows sharing the run tag.
    pub async fn record(
        &self,
        poll: &PollId,
        user: UserId,
        option_indexes: &[usize],
        run: u32,
    ) -> StoreResult<()> {
        for &option_index in option_indexes {
            let answer = Answer {
                poll_id: poll.clone(),
                user_id: user,
                option_index,
                run,
                answered_at: Utc::now(),
            };
            self.store.append_answer(&answer).await?;
        }
        Ok(())
    }

    /// Number of distinct runs the user has recorded at least one answer
    /// for. The next run number is this value plus one.
    pub async fn runs_completed_by(&self, user: UserId) -> StoreResult<u32> {
        self.store.runs_recorded(user).await
    }

    /// Vote counts per option for one poll, cumulative across the
    /// survey's entire lifetime.
    pub async fn tally(&self, poll: &PollId) -> StoreResult<Tally> {
        self.store.tally(poll).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySurveyStore;

    #[tokio::test]
    async fn record_appends_one_row_per_selected_option() {
        let store = Arc::new(MemorySurveyStore::new());
        let recorder = AnswerRecorder::new(Arc::clone(&store));

        recorder
            .record(&PollId::from("p"), UserId(1), &[0, 2], 1)
            .await
            .unwrap();

        let answers = store.answers().await;
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|answer| answer.run == 1));
        assert_eq!(answers[0].option_index, 0);
        assert_eq!(answers[1].option_index, 2);
    }

    #[tokio::test]
    async fn runs_completed_by_feeds_the_next_run_number() {
        let store = Arc::new(MemorySurveyStore::new());
        let recorder = AnswerRecorder::new(Arc::clone(&store));
        let user = UserId(9);

        assert_eq!(recorder.runs_completed_by(user).await.unwrap(), 0);

        recorder
            .record(&PollId::from("p"), user, &[0], 1)
            .await
            .unwrap();
        recorder
            .record(&PollId::from("p"), user, &[1], 2)
            .await
            .unwrap();

        assert_eq!(recorder.runs_completed_by(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn tally_is_cumulative_across_users_and_runs() {
        let store = Arc::new(MemorySurveyStore::new());
        let recorder = AnswerRecorder::new(store);
        let poll = PollId::from("p");

        recorder.record(&poll, UserId(1), &[0], 1).await.unwrap();
        recorder.record(&poll, UserId(1), &[0], 2).await.unwrap();
        recorder.record(&poll, UserId(2), &[1], 1).await.unwrap();

        let tally = recorder.tally(&poll).await.unwrap();
        assert_eq!(tally.get(&0), Some(&2));
        assert_eq!(tally.get(&1), Some(&1));
    }
}
