use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{Context, Result};
use clap::Args;
use log::warn;
use serde::de::DeserializeOwned;

use crate::dirs::{self, ensure_dir_exists};

pub struct PathSet {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl PathSet {
    pub fn new(config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => match env::var_os("QUILLCTL_CONFIG") {
                Some(dir) => PathBuf::from(dir),
                None => dirs::config_dir()?,
            },
        };

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => match env::var_os("QUILLCTL_DATA") {
                Some(dir) => PathBuf::from(dir),
                None => dirs::data_dir()?,
            },
        };

        ensure_dir_exists(&config_dir)
            .with_context(|| format!("ensure config directory: {}", config_dir.display()))?;
        ensure_dir_exists(&data_dir)
            .with_context(|| format!("ensure data directory: {}", data_dir.display()))?;

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_dir.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config toml: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// The config directory, default is `~/.config/quillctl`. Can also be set by env
    /// `QUILLCTL_CONFIG`.
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// The data directory holding the session token, default is
    /// `~/.local/share/quillctl`. Can also be set by env `QUILLCTL_DATA`.
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Override the log level from config, one of "error", "warning", "info" or "debug".
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}
