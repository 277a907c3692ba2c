use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::display;
use crate::nav::Route;
use crate::views::comments::CommentsView;

use super::{finish, ContextArgs, OutputArgs, RunCommand};

/// Comment commands
#[derive(Args)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentCommands,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    List(ListArgs),
    Add(AddArgs),
    Delete(DeleteArgs),
}

#[async_trait]
impl RunCommand for CommentCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            CommentCommands::List(args) => args.run().await,
            CommentCommands::Add(args) => args.run().await,
            CommentCommands::Delete(args) => args.run().await,
        }
    }
}

/// List the comments of an article.
#[derive(Args)]
pub struct ListArgs {
    /// Article id.
    pub article: u64,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::ArticleDetail(self.article))?;
        let mut view = CommentsView::new(ctx);
        let outcome = view.load(self.article).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }
        display::display_list(view.comments, self.output.output)
    }
}

/// Comment on an article.
#[derive(Args)]
pub struct AddArgs {
    /// Article id.
    pub article: u64,

    pub content: String,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for AddArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::ArticleDetail(self.article))?;
        let mut view = CommentsView::new(ctx);
        view.article_id = Some(self.article);
        let outcome = view.add(&self.content).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}

/// Delete a comment.
#[derive(Args)]
pub struct DeleteArgs {
    /// Comment id.
    pub id: u64,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Home)?;
        let mut view = CommentsView::new(ctx);
        let outcome = view.delete(self.id).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
