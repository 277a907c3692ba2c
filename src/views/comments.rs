use log::info;

use crate::client::RequestError;
use crate::types::comment::Comment;

use super::{Outcome, Ticket, ViewContext, ViewState};

pub struct CommentsView {
    ctx: ViewContext,
    pub state: ViewState,
    pub article_id: Option<u64>,
    pub comments: Vec<Comment>,
}

impl CommentsView {
    pub const DELETE_PROMPT: &'static str = "Are you sure you want to delete this comment?";

    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            article_id: None,
            comments: Vec::new(),
        }
    }

    pub async fn load(&mut self, article_id: u64) -> Outcome<()> {
        self.article_id = Some(article_id);
        let ticket = self.state.begin_fetch();
        let result = self.ctx.client.list_comments(article_id).await;
        self.apply_list(ticket, result)
    }

    pub fn apply_list(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Comment>, RequestError>,
    ) -> Outcome<()> {
        if !self.state.accepts(ticket) {
            return self.state.discard();
        }
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load comments")
        {
            Outcome::Success(comments) => {
                self.comments = comments;
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Post a comment on the loaded article and append it to the list.
    pub async fn add(&mut self, content: &str) -> Outcome<()> {
        let content = content.trim();
        if content.is_empty() {
            return self.state.reject("Comment cannot be empty");
        }
        let Some(article_id) = self.article_id else {
            return self.state.reject("No article selected");
        };

        self.state.begin_mutation();
        let result = self.ctx.client.add_comment(article_id, content).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to add comment")
        {
            Outcome::Success(comment) => {
                info!("Added comment {} to article {article_id}", comment.id);
                if !self.comments.iter().any(|c| c.id == comment.id) {
                    self.comments.push(comment);
                }
                self.state.banner.success("Comment added");
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    pub async fn delete(&mut self, comment_id: u64) -> Outcome<()> {
        if !self.ctx.confirm.confirm(Self::DELETE_PROMPT) {
            return self.state.cancel();
        }

        self.state.begin_mutation();
        let result = self.ctx.client.delete_comment(comment_id).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to delete comment")
        {
            Outcome::Success(_) => {
                info!("Deleted comment {comment_id}");
                self.comments.retain(|c| c.id != comment_id);
                self.state.banner.success("Comment deleted");
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    pub fn close(&mut self) {
        self.state.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::session::confirm::AssumeConfirm;
    use crate::views::testing::offline_context;
    use crate::views::Phase;

    use super::*;

    fn comment(id: u64) -> Comment {
        Comment {
            id,
            content: format!("comment {id}"),
            user: Some(String::from("alice")),
            user_id: None,
            article_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let mut view = CommentsView::new(offline_context(Some("abc")));
        view.article_id = Some(1);

        let outcome = view.add("   ").await;
        assert_eq!(outcome.phase(), Phase::Failure);
        assert_eq!(
            view.state.banner.current().unwrap().text,
            "Comment cannot be empty"
        );
    }

    #[tokio::test]
    async fn test_add_without_token() {
        let mut view = CommentsView::new(offline_context(None));
        view.article_id = Some(1);

        let outcome = view.add("hello").await;
        assert!(matches!(outcome, Outcome::Unauthenticated));
        assert!(view.comments.is_empty());
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let mut ctx = offline_context(Some("abc"));
        ctx.confirm = Arc::new(AssumeConfirm(false));
        let mut view = CommentsView::new(ctx);
        let ticket = view.state.begin_fetch();
        view.apply_list(ticket, Ok(vec![comment(1), comment(2)]));

        let outcome = view.delete(1).await;
        assert!(matches!(outcome, Outcome::Cancelled));
        assert_eq!(view.comments.len(), 2);
    }

    #[test]
    fn test_closed_view_ignores_list() {
        let mut view = CommentsView::new(offline_context(None));
        let ticket = view.state.begin_fetch();
        view.close();

        let outcome = view.apply_list(ticket, Ok(vec![comment(1)]));
        assert!(matches!(outcome, Outcome::Discarded));
        assert!(view.comments.is_empty());
    }
}
