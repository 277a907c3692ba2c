use log::info;

use crate::nav::Route;
use crate::types::user::RegisterRequest;

use super::{Outcome, Phase, ViewContext, ViewState};

pub struct RegisterView {
    ctx: ViewContext,
    pub state: ViewState,
}

impl RegisterView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self { ctx, state }
    }

    /// Create an account and go to the login screen. The new account is not
    /// logged in.
    pub async fn submit(&mut self, username: &str, email: &str, password: &str) -> Outcome<()> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return self
                .state
                .reject("Username, email and password are required");
        }

        self.state.phase = Phase::Pending;
        let req = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.ctx.client.register(&req).await;
        let outcome = self.state.resolve(
            &self.ctx.nav,
            result,
            "Registration failed, please check your details",
        );
        match outcome {
            Outcome::Success(_) => {
                info!("Registered user {username}");
                self.state
                    .banner
                    .success("Registration successful, please log in");
                self.ctx.nav.go(Route::Login);
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }
}
