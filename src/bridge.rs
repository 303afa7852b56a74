pub mod publisher;

use std::time::Duration;

use bon::Builder;
use chrono::{DateTime, Local};
use tokio::{
    signal::unix::{SignalKind, signal},
    time::{MissedTickBehavior, interval},
};

use self::publisher::{SensorPublisher, StateSink};
use crate::{
    api::{heartbeat, innonet},
    core::{lifecycle::Phase, mapper},
    prelude::*,
};

/// Upstream rate limit: never poll more often than this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// What a single cycle did to the published entities.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Fresh values are published.
    Published,

    /// The payload was unusable, the entities are published as unavailable.
    Unavailable,

    /// Nothing was published, previously published values are retained.
    Skipped,
}

/// Cooperative loop owning the lifecycle: resolve once, then poll, map, and publish.
#[derive(Builder)]
pub struct Bridge<S> {
    innonet: innonet::Api,
    publisher: SensorPublisher<S>,
    phase: Phase,
    heartbeat: heartbeat::Client,

    #[builder(into)]
    interval: Duration,
}

impl<S: StateSink> Bridge<S> {
    /// Tick until interrupted (`SIGINT` or `SIGTERM`) or until a fatal error.
    pub async fn run(mut self) -> Result {
        if self.interval < MIN_POLL_INTERVAL {
            warn!(
                requested = ?self.interval,
                minimum = ?MIN_POLL_INTERVAL,
                "the poll interval is too short, using the minimum",
            );
            self.interval = MIN_POLL_INTERVAL;
        }
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = interrupt.recv() => {
                    info!("interrupted");
                    return Ok(());
                }
                _ = terminate.recv() => {
                    info!("terminated");
                    return Ok(());
                }
            }
            if self.tick(Local::now()).await? != Outcome::Skipped {
                self.heartbeat.send().await;
            }
        }
    }

    /// Run a single poll cycle.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned, everything else is retried on the next tick.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn tick(&mut self, now: DateTime<Local>) -> Result<Outcome> {
        if self.phase.account().is_none() && !self.resolve().await? {
            return Ok(Outcome::Skipped);
        }
        let Some(account) = self.phase.account() else {
            return Ok(Outcome::Skipped);
        };

        let fetched = self.innonet.fetch(account).await;
        let sample = match fetched {
            Ok(payload) => match mapper::map(&payload, now) {
                Ok(sample) => Some(sample),
                Err(error) => {
                    warn!("unusable payload: {error:#}");
                    None
                }
            },
            Err(error @ innonet::Error::UnexpectedPayload(_)) => {
                warn!("{error:#}");
                None
            }
            Err(error) => {
                if error.is_transient() {
                    warn!("poll failed, keeping the previous values: {error:#}");
                } else {
                    error!("poll failed, keeping the previous values: {error:#}");
                }
                self.transition(|phase| phase.on_poll_failed(&error)).await;
                return Ok(Outcome::Skipped);
            }
        };

        if let Err(error) = self.publisher.publish(sample.as_ref()).await {
            error!("failed to publish: {error:#}");
            return Ok(Outcome::Skipped);
        }
        let outcome = if sample.is_some() { Outcome::Published } else { Outcome::Unavailable };
        self.transition(|phase| phase.on_polled(sample)).await;
        Ok(outcome)
    }

    /// Resolve the account, returns whether it succeeded.
    async fn resolve(&mut self) -> Result<bool> {
        let api_key = self.phase.api_key().clone();
        match self.innonet.resolve(&api_key).await {
            Ok(account) => {
                self.transition(|phase| phase.on_resolved(account)).await;
                Ok(true)
            }
            Err(error) => {
                warn!("failed to resolve the metering point: {error:#}");
                let mut fatal = None;
                self.transition(|phase| fatal = phase.on_resolution_failed(error).err()).await;
                match fatal {
                    Some(error) => Err(error).context("the bridge cannot be set up"),
                    None => Ok(false),
                }
            }
        }
    }

    /// Apply the change to the phase, and notify the user when the key gets rejected or accepted
    /// again.
    async fn transition(&mut self, apply: impl FnOnce(&mut Phase)) {
        let was_reauth_required = self.phase.is_reauth_required();
        apply(&mut self.phase);
        match (was_reauth_required, self.phase.is_reauth_required()) {
            (false, true) => {
                error!("the API key is rejected, reauthentication is required");
                if let Err(error) = self.publisher.request_reauthentication().await {
                    error!("failed to request the reauthentication: {error:#}");
                }
            }
            (true, false) => {
                info!("the API key is accepted again");
                if let Err(error) = self.publisher.dismiss_reauthentication().await {
                    warn!("failed to dismiss the reauthentication request: {error:#}");
                }
            }
            _ => {}
        }
    }
}
