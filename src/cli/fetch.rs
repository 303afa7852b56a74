use chrono::Local;
use clap::Parser;

use crate::{
    cli::innonet::InnonetArgs,
    core::mapper,
    prelude::*,
    tables::{build_forecast_table, build_sample_table},
};

#[derive(Parser)]
pub struct FetchArgs {
    #[clap(flatten)]
    innonet: InnonetArgs,
}

impl FetchArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = self.innonet.new_client()?;
        let account = self.innonet.resolve(&api).await?;
        let payload = api.fetch(&account).await?;
        println!("{}", build_forecast_table(&payload.signal.points));
        let sample = mapper::map(&payload, Local::now())?;
        println!("{}", build_sample_table(&sample));
        Ok(())
    }
}
