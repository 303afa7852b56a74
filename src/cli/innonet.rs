use clap::Parser;
use reqwest::Url;

use crate::{
    api::innonet,
    core::account::{Account, ApiKey, MeteringPointId},
    prelude::*,
};

#[derive(Parser)]
pub struct InnonetArgs {
    #[clap(long = "innonet-api-key", env = "INNONET_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Metering point number. When set, the discovery is skipped and the series names are derived
    /// from it.
    #[clap(long = "metering-point-id", env = "INNONET_METERING_POINT_ID")]
    metering_point_id: Option<MeteringPointId>,

    #[clap(
        long = "innonet-api-base-url",
        env = "INNONET_API_BASE_URL",
        default_value = innonet::DEFAULT_BASE_URL,
    )]
    base_url: Url,
}

impl InnonetArgs {
    pub fn new_client(&self) -> Result<innonet::Api> {
        innonet::Api::new(self.base_url.clone())
    }

    /// Pre-configured account, or just the key when the metering point is yet to be resolved.
    pub fn account(&self) -> Result<Account, ApiKey> {
        let api_key = ApiKey::new(self.api_key.clone());
        match &self.metering_point_id {
            Some(metering_point_id) => Ok(Account::new(api_key, metering_point_id.clone())),
            None => Err(api_key),
        }
    }

    /// Get the account, resolving it if needed.
    pub async fn resolve(&self, api: &innonet::Api) -> Result<Account> {
        match self.account() {
            Ok(account) => Ok(account),
            Err(api_key) => Ok(api.resolve(&api_key).await?),
        }
    }
}
