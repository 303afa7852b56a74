use chrono::{DateTime, Local};

use crate::core::{price::Price, signal::TariffSignal, sun_window::SunWindow};

/// Snapshot produced by a single poll cycle. The next sample supersedes it entirely.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TariffSample {
    pub signal: TariffSignal,

    /// Present only when the API reports a defined tariff for the current slot.
    pub price: Option<Price>,

    pub energy_price: Option<Price>,

    pub sun_window: SunWindow,

    pub observed_at: DateTime<Local>,
}

impl TariffSample {
    /// Grid tariff plus energy price, when both are defined.
    #[must_use]
    pub fn total_price(&self) -> Option<Price> {
        Some(self.price? + self.energy_price?)
    }
}
