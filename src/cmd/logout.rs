use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::nav::Route;
use crate::views::profile::ProfileView;

use super::{ContextArgs, RunCommand};

/// Remove the stored session token.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Profile)?;
        let mut view = ProfileView::new(ctx);
        if view.logout()? {
            eprintln!("Logged out");
        } else {
            eprintln!("Cancelled");
        }
        Ok(())
    }
}
