use chrono::{DateTime, Local};

use crate::core::{
    payload::{RawPayload, RawSeries},
    price::Price,
    sample::TariffSample,
    signal::TariffSignal,
    sun_window::SunWindow,
};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("the signal series has no value for the current slot")]
    MissingSignal,

    #[error("unknown tariff signal value `{0}`")]
    UnknownSignal(f64),
}

/// Translate the raw payload into a sample.
pub fn map(payload: &RawPayload, observed_at: DateTime<Local>) -> Result<TariffSample, MappingError> {
    let value = payload
        .signal
        .current()
        .and_then(|point| point.defined_value())
        .ok_or(MappingError::MissingSignal)?;
    let signal = TariffSignal::from_value(value).ok_or(MappingError::UnknownSignal(value))?;
    Ok(TariffSample {
        signal,
        price: payload.price.as_ref().and_then(current_price),
        energy_price: payload.energy_price.as_ref().and_then(current_price),
        sun_window: SunWindow::from_forecast(&payload.signal.points),
        observed_at,
    })
}

fn current_price(series: &RawSeries) -> Option<Price> {
    let value = series.current()?.defined_value()?;
    Some(Price::from_value(value, series.unit.as_deref()))
}
