//! API response types shared by several endpoints.

use rateit_db::repositories::VoteTally;
use serde::Serialize;

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Create a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Vote state after an upvote or removal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub upvote_count: i32,
    /// `"up"` while the user has an active upvote, `null` otherwise.
    pub user_vote: Option<&'static str>,
}

impl From<VoteTally> for VoteResponse {
    fn from(tally: VoteTally) -> Self {
        Self {
            upvote_count: tally.upvote_count,
            user_vote: tally.voted.then_some("up"),
        }
    }
}

/// Count of items.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_response_shape() {
        let up = serde_json::to_value(VoteResponse::from(VoteTally {
            upvote_count: 1,
            voted: true,
        }))
        .unwrap();
        assert_eq!(up["upvoteCount"], 1);
        assert_eq!(up["userVote"], "up");

        let none = serde_json::to_value(VoteResponse::from(VoteTally {
            upvote_count: 0,
            voted: false,
        }))
        .unwrap();
        assert!(none["userVote"].is_null());
    }
}
