#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod bridge;
mod cli;
mod core;
mod prelude;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Run(args) => args.run().await?,
        Command::Resolve(args) => args.run().await?,
        Command::Fetch(args) => args.run().await?,
    }

    info!("done!");
    Ok(())
}
