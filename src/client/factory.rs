use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::PathSet;
use crate::nav::{Navigator, Route};
use crate::session::confirm::Confirm;
use crate::session::store::FileTokenStore;
use crate::session::Session;
use crate::views::ViewContext;

use super::config::ClientConfig;
use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn new(cfg: ClientConfig) -> Self {
        Self { cfg }
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ClientConfig::load(ps)?;
        Ok(Self { cfg })
    }

    /// Open the session on the configured token file. Build this once per
    /// process and share it.
    pub fn build_session(&self) -> Arc<Session> {
        let store = FileTokenStore::new(&self.cfg.token_path);
        Arc::new(Session::new(store))
    }

    pub fn build_client(&self, session: Arc<Session>) -> Result<Client> {
        Client::new(&self.cfg.server, session).context("build server client")
    }

    pub fn build_context(&self, start: Route, confirm: Arc<dyn Confirm>) -> Result<ViewContext> {
        let session = self.build_session();
        let client = self.build_client(session)?;
        Ok(ViewContext {
            client,
            nav: Navigator::new(start),
            confirm,
            notice_ttl: Duration::from_secs(self.cfg.notice_secs),
            per_page: self.cfg.per_page,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }
}
