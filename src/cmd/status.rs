use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;

use crate::display::{self, DisplayStyle};
use crate::nav::Route;
use crate::session::observer::SessionObserver;

use super::{ContextArgs, OutputArgs, RunCommand};

/// Show whether a session token is stored and which actions are available.
/// Does not contact the server.
#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[derive(Serialize)]
struct Status {
    version: &'static str,
    target: &'static str,
    server: String,
    logged_in: bool,
    menu: Vec<String>,
}

#[async_trait]
impl RunCommand for StatusArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Home)?;
        let observer = SessionObserver::new(ctx.client.session().clone())?;

        let status = Status {
            version: env!("QUILLCTL_VERSION"),
            target: env!("QUILLCTL_TARGET"),
            server: ctx.client.url().to_string(),
            logged_in: observer.logged_in(),
            menu: observer.menu().iter().map(|item| item.to_string()).collect(),
        };

        match self.output.output {
            DisplayStyle::Json => display::pretty_json(status),
            DisplayStyle::Table => {
                println!("Client:    {} ({})", status.version, status.target);
                println!("Server:    {}", status.server);
                println!(
                    "Logged in: {}",
                    if status.logged_in { "yes" } else { "no" }
                );
                println!("Menu:      {}", status.menu.join(" | "));
                Ok(())
            }
        }
    }
}
