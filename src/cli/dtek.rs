use clap::Parser;
use reqwest::Url;

use crate::{
    api::dtek::{Address, Api},
    prelude::*,
};

#[derive(Parser)]
pub struct DtekArgs {
    #[clap(
        long = "dtek-base-url",
        env = "DTEK_BASE_URL",
        default_value = "https://www.dtek-dnem.com.ua/"
    )]
    pub base_url: Url,

    /// City, as in the DTEK address form. For example: `м. Дніпро`.
    #[clap(long = "dtek-city", env = "DTEK_CITY")]
    pub city: String,

    #[clap(long = "dtek-street", env = "DTEK_STREET")]
    pub street: String,

    #[clap(long = "dtek-house", env = "DTEK_HOUSE")]
    pub house: String,

    /// Outage queue («черга»). For example: `GPV1.1`.
    #[clap(long = "dtek-queue", env = "DTEK_QUEUE")]
    pub queue: String,
}

impl DtekArgs {
    pub fn new_client(self) -> Result<Api> {
        let address =
            Address { city: self.city, street: self.street, house: self.house, queue: self.queue };
        Api::new(self.base_url, address)
    }
}
