use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::cmd::{finish, ContextArgs, RunCommand};
use crate::nav::Route;
use crate::views::articles::ArticleListView;

/// Delete an article.
#[derive(Args)]
pub struct DeleteArgs {
    pub id: u64,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Articles)?;
        let mut view = ArticleListView::new(ctx);
        let outcome = view.delete(self.id).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
