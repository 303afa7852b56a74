use std::fmt::{Debug, Display, Formatter};

/// Energy price in euros per kilowatt-hour.
#[must_use]
#[derive(Copy, Clone, PartialEq, PartialOrd, derive_more::Add, derive_more::From, derive_more::Into)]
pub struct Price(pub f64);

impl Price {
    pub const UNIT: &'static str = "EUR/kWh";

    /// Interpret the raw value in the unit the series reports.
    pub fn from_value(value: f64, unit: Option<&str>) -> Self {
        match unit {
            Some(unit) if unit.to_lowercase().contains("cent") => Self(value / 100.0),
            _ => Self(value),
        }
    }

    /// Value as published to Home Assistant.
    #[must_use]
    pub fn rounded(self) -> f64 {
        (self.0 * 100_000.0).round() / 100_000.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}€/kWh", self.rounded())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn converts_cents() {
        assert_abs_diff_eq!(Price::from_value(23.0, Some("Cent/kWh")).0, 0.23);
        assert_abs_diff_eq!(Price::from_value(0.23, Some("EUR/kWh")).0, 0.23);
        assert_abs_diff_eq!(Price::from_value(0.23, None).0, 0.23);
    }

    #[test]
    fn display_ok() {
        assert_eq!(Price(0.23).to_string(), "0.23");
        assert_eq!(Price(0.123_456_7).to_string(), "0.12346");
    }
}
