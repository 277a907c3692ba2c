use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::nav::Route;
use crate::views::register::RegisterView;

use super::{finish, prompt_value, ContextArgs, RunCommand};

/// Create a new account. Log in afterwards with `login`.
#[derive(Args)]
pub struct RegisterArgs {
    pub username: String,

    pub email: String,

    /// Account password, prompted for when omitted.
    #[arg(long)]
    pub password: Option<String>,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for RegisterArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Register)?;
        let password = prompt_value(&self.password, "password", true)?;

        let mut view = RegisterView::new(ctx);
        let outcome = view.submit(&self.username, &self.email, &password).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
