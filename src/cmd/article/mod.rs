mod categories;
mod delete;
mod edit;
mod list;
mod show;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Args, Subcommand};

use super::RunCommand;

/// Article commands
#[derive(Args)]
pub struct ArticleCommand {
    #[command(subcommand)]
    pub command: ArticleCommands,
}

#[derive(Subcommand)]
pub enum ArticleCommands {
    List(list::ListArgs),
    Search(list::SearchArgs),
    Show(show::ShowArgs),
    Add(edit::AddArgs),
    Edit(edit::EditArgs),
    Delete(delete::DeleteArgs),
    Categories(categories::CategoriesArgs),
    Assign(categories::AssignArgs),
}

#[async_trait]
impl RunCommand for ArticleCommand {
    async fn run(&self) -> Result<()> {
        match &self.command {
            ArticleCommands::List(args) => args.run().await,
            ArticleCommands::Search(args) => args.run().await,
            ArticleCommands::Show(args) => args.run().await,
            ArticleCommands::Add(args) => args.run().await,
            ArticleCommands::Edit(args) => args.run().await,
            ArticleCommands::Delete(args) => args.run().await,
            ArticleCommands::Categories(args) => args.run().await,
            ArticleCommands::Assign(args) => args.run().await,
        }
    }
}

/// Article body given inline or read from a file.
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Article content.
    #[arg(long, short)]
    pub content: Option<String>,

    /// Read the article content from this file, `-` for stdin.
    #[arg(long, short, conflicts_with = "content")]
    pub file: Option<PathBuf>,
}

impl ContentArgs {
    pub fn read(&self) -> Result<Option<String>> {
        if let Some(ref content) = self.content {
            return Ok(Some(content.clone()));
        }
        let Some(ref path) = self.file else {
            return Ok(None);
        };
        if path.as_os_str() == "-" {
            let content = std::io::read_to_string(std::io::stdin()).context("read stdin")?;
            return Ok(Some(content));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("read content file '{}'", path.display()))?;
        Ok(Some(content))
    }

    pub fn require(&self) -> Result<String> {
        match self.read()? {
            Some(content) => Ok(content),
            None => bail!("article content is required, use `--content` or `--file`"),
        }
    }
}
