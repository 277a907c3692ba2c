use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub content: String,

    /// Author name, only present when listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentResponse {
    #[serde(default)]
    pub message: Option<String>,

    pub comment: Comment,
}

impl TerminalDisplay for Comment {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "User", "Content"]
    }

    fn table_row(self) -> Vec<String> {
        let user = match (self.user, self.user_id) {
            (Some(user), _) => user,
            (None, Some(id)) => format!("#{id}"),
            (None, None) => String::new(),
        };
        vec![self.id.to_string(), user, self.content]
    }
}
