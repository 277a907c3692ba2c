use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::display;
use crate::nav::Route;
use crate::views::categories::{CategoryAdminView, CategoryArticlesView};

use super::{finish, ContextArgs, OutputArgs, RunCommand};

/// Category commands
#[derive(Args)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    List(ListArgs),
    Add(AddArgs),
    Delete(DeleteArgs),
    Articles(ArticlesArgs),
}

#[async_trait]
impl RunCommand for CategoryCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            CategoryCommands::List(args) => args.run().await,
            CategoryCommands::Add(args) => args.run().await,
            CategoryCommands::Delete(args) => args.run().await,
            CategoryCommands::Articles(args) => args.run().await,
        }
    }
}

/// List all categories.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Categories)?;
        let mut view = CategoryAdminView::new(ctx);
        let outcome = view.load().await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }
        display::display_list(view.categories, self.output.output)
    }
}

/// Create a category.
#[derive(Args)]
pub struct AddArgs {
    pub name: String,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for AddArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Categories)?;
        let mut view = CategoryAdminView::new(ctx);
        let outcome = view.add(&self.name).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }
        display::display_list(view.categories, self.output.output)
    }
}

/// Delete a category.
#[derive(Args)]
pub struct DeleteArgs {
    pub id: u64,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Categories)?;
        let mut view = CategoryAdminView::new(ctx);
        let outcome = view.delete(self.id).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}

/// List the articles of a category.
#[derive(Args)]
pub struct ArticlesArgs {
    pub id: u64,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for ArticlesArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::CategoryArticles(self.id))?;
        let mut view = CategoryArticlesView::new(ctx);
        let outcome = view.load(self.id).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }
        display::display_list(view.articles, self.output.output)
    }
}
