use anyhow::Result;
use log::info;

use crate::nav::Route;
use crate::session::observer::SessionObserver;
use crate::types::user::Profile;

use super::{Outcome, Phase, ViewContext, ViewState};

/// The profile screen. The profile is fetched on every load and never cached.
pub struct ProfileView {
    ctx: ViewContext,
    pub state: ViewState,
    pub profile: Option<Profile>,
}

impl ProfileView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            profile: None,
        }
    }

    pub async fn load(&mut self) -> Outcome<Profile> {
        self.state.phase = Phase::Pending;
        let result = self.ctx.client.profile().await;
        let outcome = self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load profile");
        match outcome {
            Outcome::Success(profile) => {
                self.profile = Some(profile.clone());
                Outcome::Success(profile)
            }
            Outcome::Unauthenticated => {
                // Nothing to show without an identity.
                self.ctx.nav.go(Route::Login);
                Outcome::Unauthenticated
            }
            other => other,
        }
    }

    /// Confirm, clear the token and go to the login screen. Returns `false` when
    /// the user declined.
    pub fn logout(&mut self) -> Result<bool> {
        let mut observer = SessionObserver::new(self.ctx.client.session().clone())?;
        let done = observer.logout(self.ctx.confirm.as_ref(), &self.ctx.nav)?;
        if done {
            info!("Logged out");
            self.profile = None;
            self.state.banner.success("Logged out");
        }
        Ok(done)
    }
}
