//! Poll and answer domain types.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable, opaque identifier of a poll in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub String);

impl PollId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PollId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PollId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chat-platform user identity. The only authentication the bot has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chat the bot delivers polls and messages into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an already-sent message, used for in-place edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

/// A multiple-choice poll: question text plus an ordered list of option
/// labels (at least two). Immutable once seeded into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub options: Vec<String>,
}

impl Poll {
    pub fn new(
        id: impl Into<PollId>,
        question: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
        }
    }
}

/// One recorded vote: a single option of a single poll, chosen by a user
/// during one run of the survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub poll_id: PollId,
    pub user_id: UserId,
    pub option_index: usize,
    pub run: u32,
    pub answered_at: DateTime<Utc>,
}

/// Aggregated vote counts for one poll: option index to vote count, summed
/// across every run and every user.
pub type Tally = HashMap<usize, u64>;
