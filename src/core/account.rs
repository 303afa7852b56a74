use std::fmt::{Debug, Formatter};

/// Metering point number («Zählpunktnummer»), uniquely addressing the account's meter.
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::From, derive_more::FromStr)]
pub struct MeteringPointId(pub String);

impl Debug for MeteringPointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}`", self.0)
    }
}

/// INNOnet API key. It is a part of every request path, so it must never end up in logs.
#[must_use]
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "`{prefix}…`")
    }
}

/// Kinds of time series the bridge reads.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SeriesKind {
    TariffSignal,

    /// INNOnet grid tariff: the dynamic price.
    InnonetTariff,

    /// Public energy tariff, excluding the fee and VAT components.
    EnergyTariff,
}

impl SeriesKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::TariffSignal => "tariff-signal",
            Self::InnonetTariff => "innonet-tariff",
            Self::EnergyTariff => "public-energy-tariff",
        }
    }

    /// Classify a series name from the collection listing.
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.starts_with(Self::TariffSignal.prefix()) {
            Some(Self::TariffSignal)
        } else if name.starts_with(Self::InnonetTariff.prefix()) {
            Some(Self::InnonetTariff)
        } else if name.starts_with(Self::EnergyTariff.prefix())
            && !name.contains("fee")
            && !name.contains("vat")
        {
            Some(Self::EnergyTariff)
        } else {
            None
        }
    }
}

/// Exact series names discovered for the account.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeriesNames {
    pub innonet_tariff: Option<String>,
    pub energy_tariff: Option<String>,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub api_key: ApiKey,
    pub metering_point_id: MeteringPointId,
    pub series_names: SeriesNames,
}

impl Account {
    pub fn new(api_key: ApiKey, metering_point_id: MeteringPointId) -> Self {
        Self { api_key, metering_point_id, series_names: SeriesNames::default() }
    }

    /// Series name to query, falling back to `{prefix}-{ZPN}` when it has not been discovered.
    #[must_use]
    pub fn series_name(&self, kind: SeriesKind) -> String {
        let discovered = match kind {
            SeriesKind::TariffSignal => None,
            SeriesKind::InnonetTariff => self.series_names.innonet_tariff.as_ref(),
            SeriesKind::EnergyTariff => self.series_names.energy_tariff.as_ref(),
        };
        discovered
            .cloned()
            .unwrap_or_else(|| format!("{}-{}", kind.prefix(), self.metering_point_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_series_names() {
        assert_eq!(SeriesKind::of("tariff-signal-AT003"), Some(SeriesKind::TariffSignal));
        assert_eq!(SeriesKind::of("Innonet-Tariff-AT003"), Some(SeriesKind::InnonetTariff));
        assert_eq!(SeriesKind::of("public-energy-tariff-AT003"), Some(SeriesKind::EnergyTariff));
        assert_eq!(SeriesKind::of("public-energy-tariff-fee-AT003"), None);
        assert_eq!(SeriesKind::of("public-energy-tariff-vat-AT003"), None);
        assert_eq!(SeriesKind::of("validated-data-AT003"), None);
    }

    #[test]
    fn series_name_fallback() {
        let mut account =
            Account::new(ApiKey::new("key".to_string()), MeteringPointId::from("AT003".to_string()));
        assert_eq!(account.series_name(SeriesKind::TariffSignal), "tariff-signal-AT003");
        assert_eq!(account.series_name(SeriesKind::InnonetTariff), "innonet-tariff-AT003");
        account.series_names.innonet_tariff = Some("innonet-tariff-v2-AT003".to_string());
        assert_eq!(account.series_name(SeriesKind::InnonetTariff), "innonet-tariff-v2-AT003");
    }

    #[test]
    fn api_key_is_redacted() {
        let key = ApiKey::new("0123456789abcdef".to_string());
        assert_eq!(format!("{key:?}"), "`0123…`");
    }
}
