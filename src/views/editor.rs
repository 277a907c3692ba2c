use log::info;

use crate::nav::Route;
use crate::types::article::ArticleForm;

use super::{Outcome, Phase, ViewContext, ViewState};

/// Form for creating a new article or editing an existing one.
pub struct ArticleEditorView {
    ctx: ViewContext,
    pub state: ViewState,
    pub article_id: Option<u64>,
    pub title: String,
    pub content: String,
}

impl ArticleEditorView {
    const REQUIRED: &'static str = "Title and content are required";

    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            article_id: None,
            title: String::new(),
            content: String::new(),
        }
    }

    /// Fill the form with an existing article.
    pub async fn load(&mut self, id: u64) -> Outcome<()> {
        self.state.phase = Phase::Pending;
        let result = self.ctx.client.get_article(id).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load article")
        {
            Outcome::Success(article) => {
                self.article_id = Some(article.id);
                self.title = article.title;
                self.content = article.content;
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    pub async fn create(&mut self, title: &str, content: &str) -> Outcome<()> {
        let Some(form) = self.form(title, content) else {
            return self.state.reject(Self::REQUIRED);
        };

        self.state.phase = Phase::Pending;
        let result = self.ctx.client.create_article(&form).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to create article")
        {
            Outcome::Success(_) => {
                info!("Created article {:?}", form.title);
                self.title.clear();
                self.content.clear();
                self.state.banner.success("Article created");
                self.ctx.nav.go(Route::Articles);
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Save the form over the article loaded with [`ArticleEditorView::load`].
    pub async fn update(&mut self, title: &str, content: &str) -> Outcome<()> {
        let Some(id) = self.article_id else {
            return self.state.reject("No article loaded");
        };
        let Some(form) = self.form(title, content) else {
            return self.state.reject(Self::REQUIRED);
        };

        self.state.phase = Phase::Pending;
        let result = self.ctx.client.update_article(id, &form).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to update article")
        {
            Outcome::Success(_) => {
                info!("Updated article {id}");
                self.title = form.title;
                self.content = form.content;
                self.state.banner.success("Article updated");
                self.ctx.nav.go(Route::Articles);
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    fn form(&self, title: &str, content: &str) -> Option<ArticleForm> {
        let title = title.trim();
        if title.is_empty() || content.trim().is_empty() {
            return None;
        }
        Some(ArticleForm {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}
