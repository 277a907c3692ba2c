use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::logs::LogsConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_token_path")]
    pub token_path: String,

    #[serde(default = "ClientConfig::default_per_page")]
    pub per_page: u64,

    #[serde(default = "ClientConfig::default_notice_secs")]
    pub notice_secs: u64,

    #[serde(default)]
    pub logs: LogsConfig,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            token_path: Self::default_token_path(),
            per_page: Self::default_per_page(),
            notice_secs: Self::default_notice_secs(),
            logs: LogsConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // The url itself is validated when the client is built.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        self.token_path = expandenv("token_path", &self.token_path)?;
        if self.token_path.is_empty() {
            let path = ps.data_dir.join("token");
            self.token_path = format!("{}", path.display());
        }

        if self.per_page == 0 || self.per_page > Self::MAX_PER_PAGE {
            bail!(
                "per_page should be in range [1,{}], found {}",
                Self::MAX_PER_PAGE,
                self.per_page
            );
        }

        if self.notice_secs > Self::MAX_NOTICE_SECS {
            bail!(
                "notice_secs should not be greater than {}",
                Self::MAX_NOTICE_SECS
            );
        }

        Ok(())
    }
}

impl ClientConfig {
    const MAX_PER_PAGE: u64 = 100;
    const MAX_NOTICE_SECS: u64 = 60;

    pub fn default_server() -> String {
        String::from("http://127.0.0.1:5000")
    }

    pub fn default_token_path() -> String {
        String::new()
    }

    pub fn default_per_page() -> u64 {
        6
    }

    pub fn default_notice_secs() -> u64 {
        3
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        ps.load_config("client", <Self as CommonConfig>::default)
            .context("load client config")
    }
}
