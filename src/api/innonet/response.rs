use serde::Deserialize;
use serde_with::serde_as;

use crate::core::payload::{DataPoint, RawSeries};

/// Depending on the endpoint, lists come bare or wrapped into one or two `Data` levels.
/// The unit may sit at either level. Malformed items are read as defaults, so that they keep
/// their position.
#[serde_as]
#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub enum Envelope<T> {
    Bare(#[serde_as(as = "Vec<serde_with::DefaultOnError>")] Vec<T>),

    Wrapped {
        #[serde(rename = "Data", alias = "data")]
        data: Nested<T>,

        #[serde(rename = "Unit", alias = "unit", default)]
        unit: Option<String>,
    },
}

#[serde_as]
#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub enum Nested<T> {
    List(#[serde_as(as = "Vec<serde_with::DefaultOnError>")] Vec<T>),

    Object {
        #[serde_as(as = "Vec<serde_with::DefaultOnError>")]
        #[serde(rename = "Data", alias = "data")]
        data: Vec<T>,

        #[serde(rename = "Unit", alias = "unit", default)]
        unit: Option<String>,
    },
}

impl<T> Envelope<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            Self::Bare(items) => (items, None),
            Self::Wrapped { data: Nested::List(items), unit } => (items, unit),
            Self::Wrapped { data: Nested::Object { data, unit: inner_unit }, unit } => {
                (data, unit.or(inner_unit))
            }
        }
    }
}

impl From<Envelope<DataPoint>> for RawSeries {
    fn from(envelope: Envelope<DataPoint>) -> Self {
        let (points, unit) = envelope.into_parts();
        Self { unit, points }
    }
}

/// Entry of the time series collection listing.
#[derive(Default, Deserialize)]
pub struct SeriesInfo {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
}
