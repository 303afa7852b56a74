use clap::Parser;

use crate::{
    bridge::{Bridge, publisher::SensorPublisher},
    cli::{
        heartbeat::HeartbeatArgs,
        home_assistant::{EntityArgs, HomeAssistantConnectionArgs},
        innonet::InnonetArgs,
    },
    core::lifecycle::Phase,
    prelude::*,
};

#[derive(Parser)]
pub struct RunArgs {
    /// How often to poll INNOnet. Values under 15 minutes are raised to 15 minutes.
    #[clap(long, env = "POLL_INTERVAL", default_value = "15min")]
    poll_interval: humantime::Duration,

    #[clap(flatten)]
    innonet: InnonetArgs,

    #[clap(flatten)]
    home_assistant: HomeAssistantConnectionArgs,

    #[clap(flatten)]
    entities: EntityArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl RunArgs {
    pub async fn run(self) -> Result {
        let publisher =
            SensorPublisher::new(self.home_assistant.new_client()?, self.entities.into());
        Bridge::builder()
            .innonet(self.innonet.new_client()?)
            .publisher(publisher)
            .phase(Phase::new(self.innonet.account()))
            .heartbeat(self.heartbeat.new_client()?)
            .interval(self.poll_interval)
            .build()
            .run()
            .await
    }
}
