use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::client::config::ClientConfig;
use crate::config::ConfigArgs;
use crate::display;

use super::RunCommand;

/// Display the configuration in use, in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;
        let cfg = ClientConfig::load(&ps)?;
        display::pretty_json(cfg)
    }
}
