use chrono::{DateTime, Local};

use crate::core::{payload::DataPoint, signal::TariffSignal};

/// Current or next low-tariff window in the signal forecast.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SunWindow {
    pub active: bool,
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
}

impl SunWindow {
    /// Scan the forecast, the first point being the current slot.
    pub fn from_forecast(points: &[DataPoint]) -> Self {
        let is_low = |point: &DataPoint| {
            point.defined_value().and_then(TariffSignal::from_value) == Some(TariffSignal::Low)
        };
        let Some(start_index) = points.iter().position(is_low) else {
            return Self::default();
        };
        let end = points[start_index..]
            .iter()
            .find(|point| !is_low(*point))
            .and_then(|point| point.from);
        Self { active: start_index == 0, start: points[start_index].from, end }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn forecast(values: &[f64]) -> Vec<DataPoint> {
        let start = Local.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        values
            .iter()
            .zip(0..)
            .map(|(value, index)| DataPoint {
                from: Some(start + TimeDelta::minutes(15 * index)),
                value: Some(*value),
                flag: None,
            })
            .collect()
    }

    #[test]
    fn active_window() {
        let points = forecast(&[-1.0, -1.0, 0.0, 1.0]);
        let window = SunWindow::from_forecast(&points);
        assert!(window.active);
        assert_eq!(window.start, points[0].from);
        assert_eq!(window.end, points[2].from);
    }

    #[test]
    fn upcoming_window() {
        let points = forecast(&[0.0, 1.0, -1.0, -1.0, 0.0]);
        let window = SunWindow::from_forecast(&points);
        assert!(!window.active);
        assert_eq!(window.start, points[2].from);
        assert_eq!(window.end, points[4].from);
    }

    #[test]
    fn open_ended_window() {
        let points = forecast(&[0.0, -1.0]);
        let window = SunWindow::from_forecast(&points);
        assert_eq!(window.start, points[1].from);
        assert_eq!(window.end, None);
    }

    #[test]
    fn no_window() {
        assert_eq!(SunWindow::from_forecast(&forecast(&[0.0, 1.0, 0.0])), SunWindow::default());
        assert_eq!(SunWindow::from_forecast(&[]), SunWindow::default());
    }
}
