use log::info;

use crate::client::RequestError;
use crate::nav::Route;
use crate::types::user::LoginRequest;

use super::{Outcome, Phase, ViewContext, ViewState};

pub struct LoginView {
    ctx: ViewContext,
    pub state: ViewState,
}

impl LoginView {
    const DEFAULT_FAILURE: &'static str = "Login failed, please check your credentials";

    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self { ctx, state }
    }

    /// Exchange credentials for a token, store it and go home.
    ///
    /// A rejected login is reported with the backend message. It is not an
    /// expired session, so the shared policy does not apply here.
    pub async fn submit(&mut self, email: &str, password: &str) -> Outcome<()> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return self.state.reject("Email and password are required");
        }

        self.state.phase = Phase::Pending;
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = match self.ctx.client.login(&req).await {
            Ok(token) => token,
            Err(err) => return self.fail(err),
        };

        if let Err(err) = self.ctx.client.session().set(&token) {
            return self.fail(RequestError::Store(err));
        }

        info!("Logged in as {email}");
        self.state.banner.success("Login successful");
        self.state.phase = Phase::Success;
        self.ctx.nav.go(Route::Home);
        Outcome::Success(())
    }

    fn fail(&mut self, err: RequestError) -> Outcome<()> {
        let text = err
            .server_message()
            .unwrap_or(Self::DEFAULT_FAILURE)
            .to_string();
        self.state.banner.error(text);
        self.state.phase = Phase::Failure;
        Outcome::Failure(err)
    }
}
