//! Session context shared by every view.
//!
//! A [`Session`] is built once at start-up and passed around as `Arc<Session>`.
//! It wraps the durable token slot and publishes a [`SessionEvent`] on every
//! mutation, so observers in any view learn about logins, logouts and expired
//! credentials without re-reading the slot on a timer.

pub mod confirm;
pub mod observer;
pub mod store;

use anyhow::{bail, Result};
use log::{debug, info, warn};
use tokio::sync::broadcast;

use store::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new token was stored after a successful login.
    LoggedIn,
    /// The token was removed by an explicit logout.
    LoggedOut,
    /// The backend rejected the token and it was purged.
    Expired,
}

pub struct Session {
    store: Box<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    const EVENTS_CAPACITY: usize = 64;

    pub fn new<S: TokenStore + 'static>(store: S) -> Self {
        let (events, _) = broadcast::channel(Self::EVENTS_CAPACITY);
        Self {
            store: Box::new(store),
            events,
        }
    }

    pub fn get(&self) -> Result<Option<String>> {
        self.store.get()
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get()?.is_some())
    }

    pub fn set(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            bail!("refuse to store an empty token");
        }
        self.store.set(token)?;
        info!("Session token stored");
        self.publish(SessionEvent::LoggedIn);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        info!("Session token cleared");
        self.publish(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Purge the token after the backend rejected it.
    pub fn expire(&self) -> Result<()> {
        self.store.clear()?;
        warn!("Session expired, token purged");
        self.publish(SessionEvent::Expired);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is not an error.
        if self.events.send(event).is_err() {
            debug!("No session subscriber for {event:?}");
        }
    }
}
