use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::nav::Route;
use crate::views::login::LoginView;

use super::{finish, prompt_value, ContextArgs, RunCommand};

/// Log in and store the session token.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    pub email: String,

    /// Account password, prompted for when omitted.
    #[arg(long)]
    pub password: Option<String>,

    #[command(flatten)]
    pub ctx: ContextArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let ctx = self.ctx.build(Route::Login)?;
        let password = prompt_value(&self.password, "password", true)?;

        let mut view = LoginView::new(ctx);
        let outcome = view.submit(&self.email, &password).await;
        finish(&mut view.state, outcome)?;
        Ok(())
    }
}
