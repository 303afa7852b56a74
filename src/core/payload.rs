use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

/// Single time series value as reported by the API.
///
/// The API is inconsistent about key casing and sometimes uses the short `t`/`v`/`f` keys,
/// hence the aliases.
///
/// Unparsable fields are read as absent: the point must keep its position in the series,
/// because the first point is the current slot.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DataPoint {
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "From", alias = "from", alias = "t", default)]
    pub from: Option<DateTime<Local>>,

    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(rename = "Value", alias = "value", alias = "v", default)]
    pub value: Option<f64>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "Flag", alias = "flag", alias = "f", default)]
    pub flag: Option<u32>,
}

impl DataPoint {
    /// Quality flag the API uses for slots without a value.
    pub const MISSING_FLAG: u32 = 19;

    /// Value, unless the slot is flagged as missing.
    #[must_use]
    pub fn defined_value(&self) -> Option<f64> {
        if self.flag == Some(Self::MISSING_FLAG) { None } else { self.value }
    }
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSeries {
    pub unit: Option<String>,
    pub points: Vec<DataPoint>,
}

impl RawSeries {
    pub fn current(&self) -> Option<&DataPoint> {
        self.points.first()
    }
}

/// Everything a single poll cycle has fetched.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPayload {
    /// Current slot followed by the forecast.
    pub signal: RawSeries,

    pub price: Option<RawSeries>,

    pub energy_price: Option<RawSeries>,
}
