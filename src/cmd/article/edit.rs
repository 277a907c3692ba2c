use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::cmd::{finish, ContextArgs, RunCommand};
use crate::nav::Route;
use crate::views::editor::ArticleEditorView;

use super::ContentArgs;

/// Publish a new article.
#[derive(Args)]
pub struct AddArgs {
    /// Article title.
    #[arg(long, short)]
    pub title: String,

    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for AddArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::AddArticle)?;
        let content = self.content.require()?;

        let mut view = ArticleEditorView::new(ctx);
        let outcome = view.create(&self.title, &content).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}

/// Edit an article. Fields not given keep their current value.
#[derive(Args)]
pub struct EditArgs {
    pub id: u64,

    /// New title.
    #[arg(long, short)]
    pub title: Option<String>,

    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for EditArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::EditArticle(self.id))?;
        let content = self.content.read()?;

        let mut view = ArticleEditorView::new(ctx);
        let outcome = view.load(self.id).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }

        let title = self.title.clone().unwrap_or_else(|| view.title.clone());
        let content = content.unwrap_or_else(|| view.content.clone());
        let outcome = view.update(&title, &content).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
