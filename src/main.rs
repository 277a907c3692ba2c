use std::process;

use anyhow::Result;
use clap::error::ErrorKind as ArgsErrorKind;
use clap::Parser;
use quillctl::cmd::{App, RunCommand};

async fn run_cmd() -> Result<()> {
    let app = match App::try_parse() {
        Ok(app) => app,
        Err(err) => {
            err.use_stderr();
            if err.print().is_err() {
                process::exit(3);
            }
            if matches!(
                err.kind(),
                ArgsErrorKind::DisplayHelp
                    | ArgsErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ArgsErrorKind::DisplayVersion
            ) {
                return Ok(());
            }
            process::exit(3);
        }
    };

    app.run().await
}

#[tokio::main]
async fn main() {
    match run_cmd().await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Command error: {e:#}");
            process::exit(1);
        }
    }
}
