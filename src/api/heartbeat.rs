use std::time::Duration;

use reqwest::Url;

use crate::prelude::*;

/// Optional liveness ping for an external uptime monitor.
pub struct Client {
    inner: reqwest::Client,
    url: Option<Url>,
}

impl Client {
    pub fn new(url: Option<Url>) -> Result<Self> {
        let inner = reqwest::Client::builder().timeout(Duration::from_secs(3)).build()?;
        Ok(Self { inner, url })
    }

    /// Send the heartbeat, if configured. Failures are only logged.
    pub async fn send(&self) {
        if let Some(url) = &self.url
            && let Err(error) = self.send_fallible(url.clone()).await
        {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn send_fallible(&self, url: Url) -> Result {
        info!("sending a heartbeat…");
        self.inner.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    #[tokio::test]
    async fn send_ok() -> Result {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/ping").with_status(200).create_async().await;
        Client::new(Some(Url::parse(&server.url())?.join("ping")?))?.send().await;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn unconfigured_is_noop() -> Result {
        Client::new(None)?.send().await;
        Ok(())
    }
}
