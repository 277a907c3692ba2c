mod article;
mod category;
mod comment;
mod config;
mod login;
mod logout;
mod register;
mod status;
mod whoami;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use console::{style, Term};

use crate::client::config::ClientConfig;
use crate::client::factory::ClientFactory;
use crate::client::RequestError;
use crate::config::ConfigArgs;
use crate::display::DisplayStyle;
use crate::logs::{self, LogLevel};
use crate::nav::Route;
use crate::session::confirm::{AssumeConfirm, Confirm, TerminalConfirm};
use crate::views::{Outcome, ViewContext, ViewState, LOGIN_REQUIRED, SESSION_EXPIRED};

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

/// Options shared by every command talking to the backend.
#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// Do not ask for confirmation before logout or delete.
    #[arg(long, short)]
    pub yes: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ContextArgs {
    /// Load config, install the logger and build the context of a view
    /// starting at `start`.
    pub fn build(&self, start: Route) -> Result<ViewContext> {
        let ps = self.config.build_path_set()?;
        let factory = ClientFactory::load(&ps)?;
        init_logs(&self.config, factory.config())?;

        let confirm: Arc<dyn Confirm> = if self.yes {
            Arc::new(AssumeConfirm(true))
        } else {
            Arc::new(TerminalConfirm)
        };
        factory.build_context(start, confirm)
    }
}

/// Output format of listing commands.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// The display style.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,
}

pub fn init_logs(args: &ConfigArgs, cfg: &ClientConfig) -> Result<()> {
    let level = match args.log_level {
        Some(ref level) => level.parse::<LogLevel>()?,
        None => cfg.logs.level,
    };
    logs::init(level)
}

/// Turn the outcome of a view action into a command result, printing the
/// success notice to stderr. `None` means nothing happened (declined or
/// dropped).
pub fn finish<T>(state: &mut ViewState, outcome: Outcome<T>) -> Result<Option<T>> {
    let text = state.banner.current().map(|notice| notice.text.clone());
    match outcome {
        Outcome::Success(value) => {
            if let Some(text) = text {
                eprintln!("{}", style(text).green());
            }
            Ok(Some(value))
        }
        Outcome::Cancelled => {
            eprintln!("Cancelled");
            Ok(None)
        }
        Outcome::Discarded => Ok(None),
        Outcome::Unauthenticated => bail!("{LOGIN_REQUIRED}, use `quillctl login`"),
        Outcome::AuthExpired => bail!("{SESSION_EXPIRED}, use `quillctl login`"),
        Outcome::Failure(RequestError::Validation(message)) => {
            let text = text.or(message).unwrap_or_else(|| String::from("Invalid request"));
            bail!("{text}")
        }
        Outcome::Failure(err) => {
            let text = text.unwrap_or_else(|| String::from("Request failed"));
            Err(anyhow::Error::new(err).context(text))
        }
    }
}

/// Use `value` when given, otherwise prompt on the terminal.
pub fn prompt_value(value: &Option<String>, name: &str, secret: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value.clone());
    }
    let term = Term::stderr();
    if !term.is_term() {
        bail!("missing {name}, pass it with `--{name}`");
    }
    term.write_str(&format!("{}: ", style(name).bold()))
        .context("write prompt")?;
    let value = if secret {
        term.read_secure_line()
    } else {
        term.read_line()
    };
    value.with_context(|| format!("read {name}"))
}

#[derive(Parser)]
#[command(author, about, version = env!("QUILLCTL_VERSION"))]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Article(article::ArticleCommand),
    Category(category::CategoryCommand),
    Comment(comment::CommentCommand),
    Config(config::ShowConfigArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Register(register::RegisterArgs),
    Status(status::StatusArgs),
    Whoami(whoami::WhoamiArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Article(args) => args.run().await,
            Commands::Category(args) => args.run().await,
            Commands::Comment(args) => args.run().await,
            Commands::Config(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Register(args) => args.run().await,
            Commands::Status(args) => args.run().await,
            Commands::Whoami(args) => args.run().await,
        }
    }
}
