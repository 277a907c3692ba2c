//! View-state objects, one per screen.
//!
//! Every protected action ends in an [`Outcome`]. The mapping from request
//! errors to outcomes lives in [`resolve`], shared by all views.

pub mod articles;
pub mod categories;
pub mod comments;
pub mod editor;
pub mod login;
pub mod profile;
pub mod register;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::client::{Client, RequestError};
use crate::nav::{Navigator, Route};
use crate::session::confirm::Confirm;

pub const LOGIN_REQUIRED: &str = "Please log in first";
pub const SESSION_EXPIRED: &str = "Your session has expired, please log in again";

/// Everything a view needs from the application, cheap to clone.
#[derive(Clone)]
pub struct ViewContext {
    pub client: Client,
    pub nav: Navigator,
    pub confirm: Arc<dyn Confirm>,
    pub notice_ttl: Duration,
    pub per_page: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Unauthenticated,
    Success,
    AuthExpired,
    Failure,
}

#[derive(Debug)]
pub enum Outcome<T> {
    /// No token was stored, nothing was sent.
    Unauthenticated,
    Success(T),
    /// The backend rejected the token, which has been purged.
    AuthExpired,
    Failure(RequestError),
    /// The user declined the confirmation prompt.
    Cancelled,
    /// The response arrived after the view moved on and was dropped.
    Discarded,
}

impl<T> Outcome<T> {
    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Unauthenticated => Phase::Unauthenticated,
            Outcome::Success(_) => Phase::Success,
            Outcome::AuthExpired => Phase::AuthExpired,
            Outcome::Failure(_) => Phase::Failure,
            Outcome::Cancelled | Outcome::Discarded => Phase::Idle,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::AuthExpired => Outcome::AuthExpired,
            Outcome::Failure(err) => Outcome::Failure(err),
            Outcome::Cancelled => Outcome::Cancelled,
            Outcome::Discarded => Outcome::Discarded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    shown_at: Instant,
}

/// Message area next to a form. A zero ttl keeps notices until replaced.
#[derive(Debug)]
pub struct Banner {
    notice: Option<Notice>,
    ttl: Duration,
}

impl Banner {
    pub fn new(ttl: Duration) -> Self {
        Self { notice: None, ttl }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Error, text.into());
    }

    pub fn clear(&mut self) {
        self.notice = None;
    }

    pub fn current(&mut self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    /// The visible notice at `now`, dismissing it once its ttl has passed.
    pub fn current_at(&mut self, now: Instant) -> Option<&Notice> {
        let expired = match self.notice {
            Some(ref notice) => {
                !self.ttl.is_zero() && now.saturating_duration_since(notice.shown_at) >= self.ttl
            }
            None => false,
        };
        if expired {
            self.notice = None;
        }
        self.notice.as_ref()
    }

    fn show(&mut self, kind: NoticeKind, text: String) {
        self.notice = Some(Notice {
            kind,
            text,
            shown_at: Instant::now(),
        });
    }
}

/// Map a finished request to its outcome: no token aborts locally, a rejected
/// token sends the user to the login screen, anything else shows `failure` (or
/// the validation message of the backend) and leaves local state alone.
pub fn resolve<T>(
    nav: &Navigator,
    banner: &mut Banner,
    result: Result<T, RequestError>,
    failure: &str,
) -> Outcome<T> {
    match result {
        Ok(value) => Outcome::Success(value),
        Err(RequestError::MissingCredential) => {
            banner.error(LOGIN_REQUIRED);
            Outcome::Unauthenticated
        }
        Err(RequestError::Unauthorized { .. }) => {
            banner.error(SESSION_EXPIRED);
            nav.go(Route::Login);
            Outcome::AuthExpired
        }
        Err(err) => {
            warn!("{failure}: {err}");
            let text = match err {
                RequestError::Validation(Some(ref message)) => message.clone(),
                _ => failure.to_string(),
            };
            banner.error(text);
            Outcome::Failure(err)
        }
    }
}

/// Identifies one fetch so its response can be dropped if stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Shared bookkeeping of a view: the phase of the last action, its message,
/// and the fetch generation.
#[derive(Debug)]
pub struct ViewState {
    pub phase: Phase,
    pub banner: Banner,
    generation: u64,
    closed: bool,
}

impl ViewState {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            phase: Phase::Idle,
            banner: Banner::new(ctx.notice_ttl),
            generation: 0,
            closed: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Start a fetch whose result replaces the local list.
    pub fn begin_fetch(&mut self) -> Ticket {
        self.generation += 1;
        self.phase = Phase::Pending;
        Ticket(self.generation)
    }

    /// Start a mutation. In-flight fetches become stale, so they cannot undo the
    /// optimistic update applied when the mutation returns.
    pub fn begin_mutation(&mut self) {
        self.generation += 1;
        self.phase = Phase::Pending;
    }

    pub fn accepts(&self, ticket: Ticket) -> bool {
        !self.closed && ticket.0 == self.generation
    }

    /// Leave the screen. Responses arriving afterwards are ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// [`resolve`] plus phase bookkeeping. Responses reaching a closed view
    /// are dropped.
    pub fn resolve<T>(
        &mut self,
        nav: &Navigator,
        result: Result<T, RequestError>,
        failure: &str,
    ) -> Outcome<T> {
        if self.closed {
            debug!("View closed, drop response");
            return Outcome::Discarded;
        }
        let outcome = resolve(nav, &mut self.banner, result, failure);
        self.phase = outcome.phase();
        outcome
    }

    /// Reject an action locally, without a request.
    pub fn reject<T>(&mut self, message: &str) -> Outcome<T> {
        self.banner.error(message);
        self.phase = Phase::Failure;
        Outcome::Failure(RequestError::Validation(Some(message.to_string())))
    }

    pub fn cancel<T>(&mut self) -> Outcome<T> {
        self.phase = Phase::Idle;
        Outcome::Cancelled
    }

    pub fn discard<T>(&mut self) -> Outcome<T> {
        debug!("Drop stale response");
        Outcome::Discarded
    }
}


#[cfg(test)]
mod tests {
    use super::testing::offline_context;
    use super::*;

    #[test]
    fn test_banner_auto_dismiss() {
        let mut banner = Banner::new(Duration::from_secs(3));
        banner.success("Saved");

        let now = Instant::now();
        assert_eq!(banner.current_at(now).unwrap().kind, NoticeKind::Success);
        assert!(banner
            .current_at(now + Duration::from_secs(4))
            .is_none());
        assert!(banner.current_at(now).is_none());
    }

    #[test]
    fn test_banner_persistent() {
        let mut banner = Banner::new(Duration::ZERO);
        banner.error("Broken");
        let later = Instant::now() + Duration::from_secs(3600);
        assert_eq!(banner.current_at(later).unwrap().text, "Broken");
    }

    #[test]
    fn test_resolve_policy() {
        let ctx = offline_context(None);
        let mut state = ViewState::new(&ctx);

        let outcome: Outcome<()> =
            state.resolve(&ctx.nav, Err(RequestError::MissingCredential), "failed");
        assert!(matches!(outcome, Outcome::Unauthenticated));
        assert_eq!(state.banner.current().unwrap().text, LOGIN_REQUIRED);
        assert_eq!(ctx.nav.current(), Route::Home);

        let outcome: Outcome<()> = state.resolve(
            &ctx.nav,
            Err(RequestError::Unauthorized {
                code: 401,
                message: None,
            }),
            "failed",
        );
        assert!(matches!(outcome, Outcome::AuthExpired));
        assert_eq!(ctx.nav.current(), Route::Login);

        let outcome: Outcome<()> = state.resolve(
            &ctx.nav,
            Err(RequestError::Validation(Some("Title is required".to_string()))),
            "failed",
        );
        assert_eq!(outcome.phase(), Phase::Failure);
        assert_eq!(state.banner.current().unwrap().text, "Title is required");

        let outcome: Outcome<()> = state.resolve(
            &ctx.nav,
            Err(RequestError::Server {
                code: 500,
                message: None,
            }),
            "Failed to save",
        );
        assert_eq!(state.phase, Phase::Failure);
        assert!(!outcome.is_success());
        assert_eq!(state.banner.current().unwrap().text, "Failed to save");

        let outcome = state.resolve(&ctx.nav, Ok(7), "failed");
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(outcome.ok(), Some(7));
    }

    #[test]
    fn test_generation() {
        let ctx = offline_context(None);
        let mut state = ViewState::new(&ctx);

        let first = state.begin_fetch();
        assert!(state.is_pending());
        let second = state.begin_fetch();
        assert!(!state.accepts(first));
        assert!(state.accepts(second));

        state.begin_mutation();
        assert!(!state.accepts(second));

        let third = state.begin_fetch();
        state.close();
        assert!(!state.accepts(third));
        let outcome = state.resolve(&ctx.nav, Ok(()), "failed");
        assert!(matches!(outcome, Outcome::Discarded));
    }
}
