use clap::Parser;
use reqwest::Url;

use crate::{api::home_assistant, bridge::publisher::EntityIds, prelude::*};

#[derive(Parser)]
pub struct HomeAssistantConnectionArgs {
    /// Home Assistant long-lived access token.
    #[clap(
        long = "home-assistant-access-token",
        env = "HOME_ASSISTANT_ACCESS_TOKEN",
        hide_env_values = true
    )]
    access_token: String,

    /// Home Assistant API base URL.
    #[clap(
        long = "home-assistant-api-base-url",
        env = "HOME_ASSISTANT_API_BASE_URL",
        default_value = "http://localhost:8123/api"
    )]
    base_url: Url,
}

impl HomeAssistantConnectionArgs {
    pub fn new_client(&self) -> Result<home_assistant::Api> {
        home_assistant::Api::new(&self.access_token, self.base_url.clone())
    }
}

/// Entity IDs to publish to.
#[derive(Parser)]
pub struct EntityArgs {
    #[clap(long, env = "SIGNAL_ENTITY_ID", default_value = "sensor.innonet_tariff_signal")]
    signal_entity_id: String,

    #[clap(long, env = "PRICE_ENTITY_ID", default_value = "sensor.innonet_tariff_price")]
    price_entity_id: String,

    #[clap(long, env = "ENERGY_PRICE_ENTITY_ID", default_value = "sensor.innonet_energy_price")]
    energy_price_entity_id: String,

    #[clap(long, env = "TOTAL_PRICE_ENTITY_ID", default_value = "sensor.innonet_total_price")]
    total_price_entity_id: String,

    #[clap(long, env = "SUN_WINDOW_ENTITY_ID", default_value = "binary_sensor.innonet_sun_window")]
    sun_window_entity_id: String,

    #[clap(
        long,
        env = "SUN_WINDOW_START_ENTITY_ID",
        default_value = "sensor.innonet_next_sun_window_start"
    )]
    sun_window_start_entity_id: String,

    #[clap(
        long,
        env = "SUN_WINDOW_END_ENTITY_ID",
        default_value = "sensor.innonet_next_sun_window_end"
    )]
    sun_window_end_entity_id: String,
}

impl From<EntityArgs> for EntityIds {
    fn from(args: EntityArgs) -> Self {
        Self {
            signal: args.signal_entity_id,
            price: args.price_entity_id,
            energy_price: args.energy_price_entity_id,
            total_price: args.total_price_entity_id,
            sun_window: args.sun_window_entity_id,
            sun_window_start: args.sun_window_start_entity_id,
            sun_window_end: args.sun_window_end_entity_id,
        }
    }
}
