use clap::Parser;
use itertools::Itertools;

use crate::{cli::innonet::InnonetArgs, core::account::SeriesKind, prelude::*};

#[derive(Parser)]
pub struct ResolveArgs {
    #[clap(flatten)]
    innonet: InnonetArgs,
}

impl ResolveArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = self.innonet.new_client()?;
        let account = self.innonet.resolve(&api).await?;
        let series = [SeriesKind::TariffSignal, SeriesKind::InnonetTariff, SeriesKind::EnergyTariff]
            .into_iter()
            .map(|kind| account.series_name(kind))
            .join(", ");
        println!("Metering point: {}", account.metering_point_id);
        println!("Series: {series}");
        Ok(())
    }
}
