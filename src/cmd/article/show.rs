use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cmd::{finish, ContextArgs, OutputArgs, RunCommand};
use crate::display::{self, DisplayStyle};
use crate::nav::Route;
use crate::types::article::Article;
use crate::types::comment::Comment;
use crate::views::articles::ArticleDetailView;

/// Show an article with its comments.
#[derive(Args)]
pub struct ShowArgs {
    pub id: u64,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[derive(Serialize)]
struct ArticleDetail {
    article: Article,
    comments: Vec<Comment>,
}

#[async_trait]
impl RunCommand for ShowArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::ArticleDetail(self.id))?;
        let mut view = ArticleDetailView::new(ctx);
        let outcome = view.load(self.id).await;
        if finish(&mut view.state, outcome)?.is_none() {
            return Ok(());
        }
        let Some(article) = view.article else {
            return Ok(());
        };
        let comments = view.comments.comments;

        if let DisplayStyle::Json = self.output.output {
            return display::pretty_json(ArticleDetail { article, comments });
        }

        println!("{}", style(&article.title).bold());
        if let Some(ref author) = article.author {
            println!("by {author}");
        }
        if let Some(ref categories) = article.categories {
            let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
            if !names.is_empty() {
                println!("Categories: {}", names.join(", "));
            }
        }
        println!();
        println!("{}", article.content);
        println!();
        display::display_list(comments, DisplayStyle::Table)
    }
}
