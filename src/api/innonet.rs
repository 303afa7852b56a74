//! [INNOnet](https://www.innonet.at) time series API client.

mod error;
mod response;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

pub use self::error::Error;
use self::response::{Envelope, SeriesInfo};
use crate::{
    core::{
        account::{Account, ApiKey, MeteringPointId, SeriesKind, SeriesNames},
        payload::{DataPoint, RawPayload, RawSeries},
    },
    prelude::*,
};

pub const DEFAULT_BASE_URL: &str = "https://app-innonnetwebtsm-dev.azurewebsites.net/api/extensions/timeseriesauthorization/repositories/INNOnet-prod/apikey";

/// Time expressions understood by the API: `now[15m` is `now` floored to the quarter-hour.
const SLOT_START: &str = "now[15m";
const SLOT_END: &str = "now[15m+15m";
const FORECAST_END: &str = "now[15m+48h";

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn new(base_url: Url) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be used as a base URL");
        let client = Client::builder()
            .user_agent(concat!("innonet/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Discover the metering point and the exact series names associated with the key.
    #[instrument(skip_all, fields(api_key = ?api_key))]
    pub async fn resolve(&self, api_key: &ApiKey) -> Result<Account, Error> {
        if api_key.is_empty() {
            return Err(Error::Authentication);
        }
        info!("resolving the metering point…");
        let mut url = self.url(api_key, &["timeseriescollections", "selected-data"]);
        url.query_pairs_mut().append_pair("from", "today").append_pair("to", "today+1d");
        let (series, _) = self
            .get::<Envelope<SeriesInfo>>(url, "selected-data")
            .await?
            .ok_or_else(|| Error::NotFound("the account has no time series".to_string()))?
            .into_parts();

        let mut metering_point_id = None;
        let mut series_names = SeriesNames::default();
        for SeriesInfo { name } in series {
            match SeriesKind::of(&name) {
                Some(SeriesKind::TariffSignal) if metering_point_id.is_none() => {
                    let suffix = name
                        .get(SeriesKind::TariffSignal.prefix().len()..)
                        .unwrap_or_default()
                        .trim_start_matches('-');
                    if !suffix.is_empty() {
                        metering_point_id = Some(MeteringPointId::from(suffix.to_string()));
                    }
                }
                Some(SeriesKind::InnonetTariff) if series_names.innonet_tariff.is_none() => {
                    series_names.innonet_tariff = Some(name);
                }
                Some(SeriesKind::EnergyTariff) if series_names.energy_tariff.is_none() => {
                    series_names.energy_tariff = Some(name);
                }
                _ => {}
            }
        }

        let metering_point_id = metering_point_id.ok_or_else(|| {
            Error::NotFound("no `tariff-signal-{ZPN}` series is associated with the key".to_string())
        })?;
        info!(?metering_point_id, ?series_names, "resolved");
        Ok(Account { api_key: api_key.clone(), metering_point_id, series_names })
    }

    /// Fetch the signal forecast and the current prices: one request per series.
    ///
    /// Only the signal series is required. Price failures other than a rejected key yield no price.
    #[instrument(skip_all, fields(metering_point_id = ?account.metering_point_id))]
    pub async fn fetch(&self, account: &Account) -> Result<RawPayload, Error> {
        let (signal, price, energy_price) = tokio::try_join!(
            self.get_series(account, SeriesKind::TariffSignal, FORECAST_END),
            self.get_optional_series(account, SeriesKind::InnonetTariff),
            self.get_optional_series(account, SeriesKind::EnergyTariff),
        )?;
        let signal = signal.unwrap_or_else(|| {
            warn!("the signal series is missing");
            RawSeries::default()
        });
        info!(
            n_signal_points = signal.points.len(),
            has_price = price.is_some(),
            has_energy_price = energy_price.is_some(),
            "fetched",
        );
        Ok(RawPayload { signal, price, energy_price })
    }

    /// Fetch the current slot of a price series, demoting any failure but a rejected key to `None`.
    async fn get_optional_series(
        &self,
        account: &Account,
        kind: SeriesKind,
    ) -> Result<Option<RawSeries>, Error> {
        match self.get_series(account, kind, SLOT_END).await {
            Ok(series) => Ok(series),
            Err(Error::Authentication) => Err(Error::Authentication),
            Err(error) => {
                warn!(?kind, "price is unavailable: {error:#}");
                Ok(None)
            }
        }
    }

    /// Fetch the series since the current slot start, `None` if the series does not exist.
    #[instrument(skip_all, level = Level::DEBUG, fields(kind = ?kind, until = until))]
    async fn get_series(
        &self,
        account: &Account,
        kind: SeriesKind,
        until: &str,
    ) -> Result<Option<RawSeries>, Error> {
        let name = account.series_name(kind);
        let mut url = self.url(&account.api_key, &["timeseries", &name, "data"]);
        url.query_pairs_mut()
            .append_pair("from", SLOT_START)
            .append_pair("to", until)
            .append_pair("interval", "Minute")
            .append_pair("intervalMultiplier", "15")
            .append_pair("aggregation", "AtTheMoment");
        Ok(self.get::<Envelope<DataPoint>>(url, &name).await?.map(RawSeries::from))
    }

    /// Perform the request, `None` on 404.
    async fn get<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<Option<T>, Error> {
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(context, "not found");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(Error::from_status(status, context)),
        }
    }

    /// Build `{base_url}/{api_key}/{segments…}`.
    fn url(&self, api_key: &ApiKey, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(api_key.expose()).extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;

    fn api(server: &ServerGuard) -> Api {
        Api::new(Url::parse(&server.url()).unwrap()).unwrap()
    }

    fn api_key() -> ApiKey {
        ApiKey::new("secret".to_string())
    }

    #[tokio::test]
    async fn resolve_ok() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/secret/timeseriescollections/selected-data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "today".into()),
                Matcher::UrlEncoded("to".into(), "today+1d".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            // language=json
            .with_body(
                r#"{
                    "Data": [
                        {"Id": 1, "Name": "public-energy-tariff-fee-AT003"},
                        {"Id": 2, "Name": "public-energy-tariff-AT003"},
                        {"Id": 3, "Name": "tariff-signal-AT003"},
                        {"Id": 4, "Name": "innonet-tariff-AT003"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let account = api(&server).resolve(&api_key()).await?;
        assert_eq!(account.metering_point_id, MeteringPointId::from("AT003".to_string()));
        assert_eq!(account.series_names.innonet_tariff.as_deref(), Some("innonet-tariff-AT003"));
        assert_eq!(
            account.series_names.energy_tariff.as_deref(),
            Some("public-energy-tariff-AT003")
        );
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn resolve_rejected_key() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/secret/timeseriescollections/selected-data")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let result = api(&server).resolve(&api_key()).await;
        assert!(matches!(result, Err(Error::Authentication)));
    }

    #[tokio::test]
    async fn resolve_empty_key_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let result = api(&server).resolve(&ApiKey::new("  ".to_string())).await;
        assert!(matches!(result, Err(Error::Authentication)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn resolve_without_metering_point() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/secret/timeseriescollections/selected-data")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"name": "validated-data-AT003"}]"#)
            .create_async()
            .await;

        let result = api(&server).resolve(&api_key()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_server_error_is_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/secret/timeseriescollections/selected-data")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = api(&server).resolve(&api_key()).await;
        assert!(result.is_err_and(|error| error.is_transient()));
    }

    #[tokio::test]
    async fn fetch_ok() -> Result {
        let mut server = Server::new_async().await;
        let signal_mock = server
            .mock("GET", "/secret/timeseries/tariff-signal-AT003/data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "now[15m".into()),
                Matcher::UrlEncoded("to".into(), "now[15m+48h".into()),
                Matcher::UrlEncoded("aggregation".into(), "AtTheMoment".into()),
            ]))
            .with_status(200)
            // language=json
            .with_body(
                r#"{"Data": [
                    {"From": "2025-06-01T10:00:00Z", "Value": 1.0, "Flag": 9},
                    {"From": "2025-06-01T10:15:00Z", "Value": -1.0, "Flag": 9}
                ]}"#,
            )
            .create_async()
            .await;
        let price_mock = server
            .mock("GET", "/secret/timeseries/innonet-tariff-AT003/data")
            .match_query(Matcher::UrlEncoded("to".into(), "now[15m+15m".into()))
            .with_status(200)
            // language=json
            .with_body(
                r#"{"Data": {"Unit": "Cent/kWh", "Data": [{"From": "2025-06-01T10:00:00Z", "Value": 23.0, "Flag": 9}]}}"#,
            )
            .create_async()
            .await;
        let energy_price_mock = server
            .mock("GET", "/secret/timeseries/public-energy-tariff-AT003/data")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let account = Account::new(api_key(), MeteringPointId::from("AT003".to_string()));
        let payload = api(&server).fetch(&account).await?;
        assert_eq!(payload.signal.points.len(), 2);
        let price = payload.price.unwrap();
        assert_eq!(price.unit.as_deref(), Some("Cent/kWh"));
        assert_abs_diff_eq!(price.points[0].value.unwrap(), 23.0);
        assert!(payload.energy_price.is_none());

        signal_mock.assert_async().await;
        price_mock.assert_async().await;
        energy_price_mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn fetch_rejected_key() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/secret/timeseries/".to_string()))
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let account = Account::new(api_key(), MeteringPointId::from("AT003".to_string()));
        let result = api(&server).fetch(&account).await;
        assert!(matches!(result, Err(Error::Authentication)));
    }

    #[tokio::test]
    async fn fetch_tolerates_broken_prices() -> Result {
        let mut server = Server::new_async().await;
        let _signal = server
            .mock("GET", "/secret/timeseries/tariff-signal-AT003/data")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Data": [{"From": "2025-06-01T10:00:00Z", "Value": 1.0, "Flag": 9}]}"#)
            .create_async()
            .await;
        let _price = server
            .mock("GET", "/secret/timeseries/innonet-tariff-AT003/data")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let _energy_price = server
            .mock("GET", "/secret/timeseries/public-energy-tariff-AT003/data")
            .match_query(Matcher::Any)
            .with_status(400)
            .create_async()
            .await;

        let account = Account::new(api_key(), MeteringPointId::from("AT003".to_string()));
        let payload = api(&server).fetch(&account).await?;
        assert_eq!(payload.signal.points.len(), 1);
        assert!(payload.price.is_none());
        assert!(payload.energy_price.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn fetch_rejected_price_key() {
        let mut server = Server::new_async().await;
        let _signal = server
            .mock("GET", "/secret/timeseries/tariff-signal-AT003/data")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Data": []}"#)
            .create_async()
            .await;
        let _prices = server
            .mock("GET", Matcher::Regex("innonet-tariff|public-energy-tariff".to_string()))
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let account = Account::new(api_key(), MeteringPointId::from("AT003".to_string()));
        let result = api(&server).fetch(&account).await;
        assert!(matches!(result, Err(Error::Authentication)));
    }

    #[tokio::test]
    async fn fetch_garbage_is_unexpected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/secret/timeseries/".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let account = Account::new(api_key(), MeteringPointId::from("AT003".to_string()));
        let result = api(&server).fetch(&account).await;
        assert!(matches!(result, Err(Error::UnexpectedPayload(_))));
    }
}
