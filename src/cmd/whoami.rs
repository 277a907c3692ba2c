use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::display;
use crate::nav::Route;
use crate::views::profile::ProfileView;

use super::{finish, ContextArgs, RunCommand};

/// Display the profile of the logged in user.
#[derive(Args)]
pub struct WhoamiArgs {
    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for WhoamiArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Profile)?;
        let mut view = ProfileView::new(ctx);
        let outcome = view.load().await;
        if let Some(profile) = finish(&mut view.state, outcome)? {
            display::pretty_json(profile)?;
        }
        Ok(())
    }
}
