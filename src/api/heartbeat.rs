use std::time::Duration;

use reqwest::Url;

use crate::prelude::*;

/// Optional dead man's switch pinged after every successful watch cycle.
pub struct Client {
    inner: reqwest::Client,
    url: Option<Url>,
}

impl Client {
    pub fn new(url: Option<Url>) -> Result<Self> {
        let inner = reqwest::Client::builder().timeout(Duration::from_secs(3)).build()?;
        Ok(Self { inner, url })
    }

    /// Never fails, a missed heartbeat is only worth a warning.
    pub async fn send(&self) {
        if let Some(url) = &self.url
            && let Err(error) = self.send_fallible(url.clone()).await
        {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn send_fallible(&self, url: Url) -> Result {
        debug!("sending a heartbeat…");
        self.inner.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}
