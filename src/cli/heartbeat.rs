use clap::Parser;
use reqwest::Url;

use crate::{api::heartbeat, prelude::*};

#[derive(Parser)]
pub struct HeartbeatArgs {
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    url: Option<Url>,
}

impl HeartbeatArgs {
    pub fn new_client(self) -> Result<heartbeat::Client> {
        heartbeat::Client::new(self.url)
    }
}
