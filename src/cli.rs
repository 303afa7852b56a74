mod fetch;
mod heartbeat;
mod home_assistant;
mod innonet;
mod resolve;
mod run;

use clap::{Parser, Subcommand};

use crate::cli::{fetch::FetchArgs, resolve::ResolveArgs, run::RunArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll INNOnet and keep the Home Assistant entities up to date.
    #[clap(name = "run")]
    Run(Box<RunArgs>),

    /// Discover the metering point and the series associated with the API key.
    #[clap(name = "resolve")]
    Resolve(Box<ResolveArgs>),

    /// Fetch and print the current tariff and the signal forecast, without publishing.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),
}
