use std::fmt::{Display, Formatter};

use comfy_table::Color;

/// Discrete pricing regime announced by INNOnet for a 15-minute slot.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TariffSignal {
    /// Sun window («Sonnenfenster»): promotional low tariff tied to solar generation.
    Low,

    Standard,

    High,
}

impl TariffSignal {
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Low => -1,
            Self::Standard => 0,
            Self::High => 1,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Tariff (Sun)",
            Self::Standard => "Standard Tariff",
            Self::High => "High Tariff",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Low => "mdi:weather-sunny",
            Self::Standard => "mdi:transmission-tower",
            Self::High => "mdi:alert-circle-outline",
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Low => Color::Green,
            Self::Standard => Color::Reset,
            Self::High => Color::Red,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Low),
            0 => Some(Self::Standard),
            1 => Some(Self::High),
            _ => None,
        }
    }

    /// Interpret the raw series value, which the API reports as a float.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_value(value: f64) -> Option<Self> {
        if value.is_finite() && value.fract() == 0.0 {
            Self::from_code(value as i64)
        } else {
            None
        }
    }
}

impl Display for TariffSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for signal in [TariffSignal::Low, TariffSignal::Standard, TariffSignal::High] {
            assert_eq!(TariffSignal::from_code(i64::from(signal.code())), Some(signal));
        }
    }

    #[test]
    fn from_value_ok() {
        assert_eq!(TariffSignal::from_value(-1.0), Some(TariffSignal::Low));
        assert_eq!(TariffSignal::from_value(0.0), Some(TariffSignal::Standard));
        assert_eq!(TariffSignal::from_value(1.0), Some(TariffSignal::High));
    }

    #[test]
    fn from_value_rejects_unknown() {
        assert_eq!(TariffSignal::from_value(2.0), None);
        assert_eq!(TariffSignal::from_value(0.5), None);
        assert_eq!(TariffSignal::from_value(f64::NAN), None);
    }

    #[test]
    fn low_tariff_label() {
        assert_eq!(TariffSignal::Low.to_string(), "Low Tariff (Sun)");
    }
}
