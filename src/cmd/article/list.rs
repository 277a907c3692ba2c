use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use crate::cmd::{finish, ContextArgs, OutputArgs, RunCommand};
use crate::display::{self, DisplayStyle};
use crate::nav::Route;
use crate::views::articles::ArticleListView;

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// The page number to show.
    #[arg(long, short, default_value = "1")]
    pub page: u64,

    /// Articles per page, default comes from config.
    #[arg(long)]
    pub per_page: Option<u64>,
}

/// List articles, newest first.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for ListArgs {
    async fn run(&self) -> Result<()> {
        show_page(&self.ctx, &self.page, &self.output, None).await
    }
}

/// Search articles by title or content.
#[derive(Args)]
pub struct SearchArgs {
    /// Search keyword, empty lists every article.
    pub query: String,

    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for SearchArgs {
    async fn run(&self) -> Result<()> {
        show_page(&self.ctx, &self.page, &self.output, Some(&self.query)).await
    }
}

async fn show_page(
    ctx_args: &ContextArgs,
    page: &PageArgs,
    output: &OutputArgs,
    query: Option<&str>,
) -> Result<()> {
    if page.page == 0 {
        bail!("page must be greater than 0");
    }
    let mut ctx = ctx_args.build(Route::Articles)?;
    if let Some(per_page) = page.per_page {
        if per_page == 0 {
            bail!("per_page must be greater than 0");
        }
        ctx.per_page = per_page;
    }

    let mut view = ArticleListView::new(ctx);
    view.set_search(query);
    let outcome = view.goto(page.page).await;
    if finish(&mut view.state, outcome)?.is_none() {
        return Ok(());
    }

    let (current, pages, total) = (view.page, view.pages, view.total);
    display::display_list(view.articles, output.output)?;
    if let DisplayStyle::Table = output.output {
        eprintln!("Page {current}/{pages}, {total} articles");
    }
    Ok(())
}
