use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat};

use crate::{
    api::home_assistant::{self, EntityState, Notification},
    core::{price::Price, sample::TariffSample},
    prelude::*,
};

/// Where the entity states go.
#[async_trait]
pub trait StateSink: Sync {
    async fn set_state(&self, entity_id: &str, state: &EntityState) -> Result;

    async fn create_notification(&self, notification: &Notification) -> Result;

    async fn dismiss_notification(&self, notification_id: &str) -> Result;
}

#[async_trait]
impl StateSink for home_assistant::Api {
    async fn set_state(&self, entity_id: &str, state: &EntityState) -> Result {
        Self::set_state(self, entity_id, state).await
    }

    async fn create_notification(&self, notification: &Notification) -> Result {
        Self::create_notification(self, notification).await
    }

    async fn dismiss_notification(&self, notification_id: &str) -> Result {
        Self::dismiss_notification(self, notification_id).await
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityIds {
    pub signal: String,
    pub price: String,
    pub energy_price: String,
    pub total_price: String,
    pub sun_window: String,
    pub sun_window_start: String,
    pub sun_window_end: String,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self {
            signal: "sensor.innonet_tariff_signal".to_string(),
            price: "sensor.innonet_tariff_price".to_string(),
            energy_price: "sensor.innonet_energy_price".to_string(),
            total_price: "sensor.innonet_total_price".to_string(),
            sun_window: "binary_sensor.innonet_sun_window".to_string(),
            sun_window_start: "sensor.innonet_next_sun_window_start".to_string(),
            sun_window_end: "sensor.innonet_next_sun_window_end".to_string(),
        }
    }
}

pub struct SensorPublisher<S> {
    sink: S,
    entity_ids: EntityIds,
}

impl<S: StateSink> SensorPublisher<S> {
    const REAUTH_NOTIFICATION_ID: &'static str = "innonet_reauth";

    pub const fn new(sink: S, entity_ids: EntityIds) -> Self {
        Self { sink, entity_ids }
    }

    #[cfg(test)]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Push the sample, or unavailable states when there is none.
    ///
    /// Every entity is attempted even if some fail, so that a single rejected entity does not
    /// leave the others stale. Fails if any entity has not been published.
    #[instrument(skip_all, fields(signal = ?sample.map(|sample| sample.signal)))]
    pub async fn publish(&self, sample: Option<&TariffSample>) -> Result {
        let mut n_failed = 0_usize;
        for (entity_id, state) in self.render(sample) {
            if let Err(error) = self.sink.set_state(entity_id, &state).await {
                warn!(entity_id, "failed to publish: {error:#}");
                n_failed += 1;
            }
        }
        ensure!(n_failed == 0, "failed to publish {n_failed} entities");
        info!("published");
        Ok(())
    }

    pub async fn request_reauthentication(&self) -> Result {
        let notification = Notification {
            notification_id: Self::REAUTH_NOTIFICATION_ID.to_string(),
            title: "INNOnet: reauthentication required".to_string(),
            message: "The INNOnet API key has been rejected. Update the key in the bridge \
                      configuration; the sensors stay frozen until then."
                .to_string(),
        };
        self.sink.create_notification(&notification).await
    }

    /// Remove the reauthentication request once the key works again.
    pub async fn dismiss_reauthentication(&self) -> Result {
        self.sink.dismiss_notification(Self::REAUTH_NOTIFICATION_ID).await
    }

    fn render(&self, sample: Option<&TariffSample>) -> Vec<(&str, EntityState)> {
        let ids = &self.entity_ids;
        let signal = sample.map_or_else(EntityState::unavailable, |sample| {
            EntityState::new(sample.signal.label())
                .with_attribute("raw_value", i64::from(sample.signal.code()))
                .with_attribute("icon", sample.signal.icon())
                .with_attribute("observed_at", format_timestamp(sample.observed_at))
        });
        let sun_window = sample.map_or_else(EntityState::unavailable, |sample| {
            EntityState::new(if sample.sun_window.active { "on" } else { "off" })
        });
        vec![
            (ids.signal.as_str(), signal_entity(signal)),
            (
                ids.price.as_str(),
                price_entity(price_state(sample, |sample| sample.price), "INNOnet tariff"),
            ),
            (
                ids.energy_price.as_str(),
                price_entity(
                    price_state(sample, |sample| sample.energy_price),
                    "INNOnet energy price",
                ),
            ),
            (
                ids.total_price.as_str(),
                price_entity(price_state(sample, TariffSample::total_price), "INNOnet total price"),
            ),
            (ids.sun_window.as_str(), sun_window_entity(sun_window)),
            (
                ids.sun_window_start.as_str(),
                timestamp_entity(
                    timestamp_state(sample, |sample| sample.sun_window.start),
                    "INNOnet next sun window start",
                ),
            ),
            (
                ids.sun_window_end.as_str(),
                timestamp_entity(
                    timestamp_state(sample, |sample| sample.sun_window.end),
                    "INNOnet next sun window end",
                ),
            ),
        ]
    }
}

fn signal_entity(state: EntityState) -> EntityState {
    state.with_attribute("friendly_name", "INNOnet tariff signal")
}

fn price_entity(state: EntityState, friendly_name: &str) -> EntityState {
    state
        .with_attribute("friendly_name", friendly_name)
        .with_attribute("unit_of_measurement", Price::UNIT)
        .with_attribute("device_class", "monetary")
        .with_attribute("state_class", "total")
        .with_attribute("icon", "mdi:currency-eur")
}

fn sun_window_entity(state: EntityState) -> EntityState {
    state
        .with_attribute("friendly_name", "INNOnet sun window")
        .with_attribute("icon", "mdi:solar-power")
}

fn timestamp_entity(state: EntityState, friendly_name: &str) -> EntityState {
    state.with_attribute("friendly_name", friendly_name).with_attribute("device_class", "timestamp")
}

/// Absent price is unavailable, never zero.
fn price_state(
    sample: Option<&TariffSample>,
    price: impl FnOnce(&TariffSample) -> Option<Price>,
) -> EntityState {
    sample
        .and_then(price)
        .map_or_else(EntityState::unavailable, |price| EntityState::new(price.to_string()))
}

/// Home Assistant shows `unknown` for a sensor without a value.
fn timestamp_state(
    sample: Option<&TariffSample>,
    timestamp: impl FnOnce(&TariffSample) -> Option<DateTime<Local>>,
) -> EntityState {
    let Some(sample) = sample else {
        return EntityState::unavailable();
    };
    timestamp(sample).map_or_else(
        || EntityState::new("unknown"),
        |timestamp| EntityState::new(format_timestamp(timestamp)),
    )
}

fn format_timestamp(timestamp: DateTime<Local>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}
