use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use log::{debug, info};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;

use crate::nav::{Navigator, Route};

use super::confirm::Confirm;
use super::{Session, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Articles,
    AddArticle,
    Categories,
    Profile,
    Logout,
    Login,
    Register,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuItem::Articles => "Articles",
            MenuItem::AddArticle => "Add Article",
            MenuItem::Categories => "Categories",
            MenuItem::Profile => "Profile",
            MenuItem::Logout => "Logout",
            MenuItem::Login => "Login",
            MenuItem::Register => "Register",
        };
        write!(f, "{name}")
    }
}

/// Keeps the "logged in" flag of the navigation bar in step with the session.
///
/// The flag is read from the store once on creation and re-derived whenever a
/// session event arrives. Dropping the observer drops its subscription.
pub struct SessionObserver {
    session: Arc<Session>,
    events: Receiver<SessionEvent>,
    logged_in: bool,
}

impl SessionObserver {
    pub const LOGOUT_PROMPT: &'static str = "Are you sure you want to log out?";

    pub fn new(session: Arc<Session>) -> Result<Self> {
        // Subscribe before reading, so a mutation in between is not missed.
        let events = session.subscribe();
        let logged_in = session.is_logged_in()?;
        Ok(Self {
            session,
            events,
            logged_in,
        })
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    /// Drain pending events and refresh the flag if any arrived.
    pub fn sync(&mut self) -> Result<bool> {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    debug!("Observer received {event:?}");
                    changed = true;
                }
                Err(TryRecvError::Lagged(n)) => {
                    debug!("Observer lagged {n} events");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.refresh()?;
        }
        Ok(self.logged_in)
    }

    /// Wait for the next session event and refresh the flag. Returns `None`
    /// once the session is gone.
    pub async fn next_change(&mut self) -> Result<Option<SessionEvent>> {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    self.refresh()?;
                    return Ok(Some(event));
                }
                Err(RecvError::Lagged(_)) => {
                    self.refresh()?;
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        if self.logged_in {
            vec![
                MenuItem::Articles,
                MenuItem::AddArticle,
                MenuItem::Categories,
                MenuItem::Profile,
                MenuItem::Logout,
            ]
        } else {
            vec![MenuItem::Articles, MenuItem::Login, MenuItem::Register]
        }
    }

    /// Ask for confirmation, then clear the token and go to the login screen.
    /// Returns `false` when the user declined, in which case nothing changes.
    pub fn logout(&mut self, confirm: &dyn Confirm, nav: &Navigator) -> Result<bool> {
        if !confirm.confirm(Self::LOGOUT_PROMPT) {
            info!("Logout cancelled");
            return Ok(false);
        }
        self.session.clear()?;
        self.logged_in = false;
        nav.go(Route::Login);
        Ok(true)
    }

    fn refresh(&mut self) -> Result<()> {
        self.logged_in = self.session.is_logged_in()?;
        Ok(())
    }
}
