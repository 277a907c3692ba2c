use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use crate::cmd::{finish, ContextArgs, OutputArgs, RunCommand};
use crate::display;
use crate::nav::Route;
use crate::views::categories::ArticleCategoriesView;

/// List the categories of an article.
#[derive(Args)]
pub struct CategoriesArgs {
    pub id: u64,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for CategoriesArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::ArticleCategories(self.id))?;
        let mut view = ArticleCategoriesView::new(ctx);
        let outcome = view.load(self.id).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }

        let assigned = view
            .categories
            .into_iter()
            .filter(|c| view.selected.contains(&c.id))
            .collect();
        display::display_list(assigned, self.output.output)
    }
}

/// Add categories to an article. Existing assignments are kept.
#[derive(Args)]
pub struct AssignArgs {
    pub id: u64,

    /// Category ids to assign.
    #[arg(required = true, num_args = 1..)]
    pub categories: Vec<u64>,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for AssignArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::ArticleCategories(self.id))?;
        let mut view = ArticleCategoriesView::new(ctx);
        let outcome = view.load(self.id).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }

        for id in self.categories.iter().copied() {
            if !view.categories.iter().any(|c| c.id == id) {
                bail!("category {id} does not exist");
            }
            if !view.selected.contains(&id) {
                view.toggle(id);
            }
        }

        let outcome = view.save().await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
