//! `reqwest` transport to the live data endpoint.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};

use crate::prelude::*;
use crate::settings::Settings;
use crate::transport::{Payload, Reply, Transport, TransportError};

pub const USER_AGENT: &str = concat!("live-push/", env!("CARGO_PKG_VERSION"));

/// Fixed timeout of a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn builder(timeout: Duration) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(reqwest::header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    Client::builder()
        .gzip(true)
        .use_rustls_tls()
        .default_headers(headers)
        .timeout(timeout)
}

/// Posts payloads to the configured URL with the `apikey` header.
pub struct HttpTransport {
    client: Client,
    url: String,
    header_key: HeaderValue,
}

impl HttpTransport {
    pub fn new(settings: &Settings, timeout: Duration) -> Result<Self> {
        let mut header_key =
            HeaderValue::from_str(&settings.header_key).context("`header_key` is not a valid header value")?;
        header_key.set_sensitive(true);
        Ok(Self {
            client: builder(timeout).build()?,
            url: settings.url.clone(),
            header_key,
        })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, payload: &Payload<'_>) -> Result<Reply, TransportError> {
        debug!("Posting {} {} to {}…", payload.p_value, payload.p_unit, self.url);
        let response = self
            .client
            .post(&self.url)
            .header("apikey", self.header_key.clone())
            .json(payload)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Finished with {}.", status);
        Ok(Reply { status, body })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else {
            TransportError::Other(error.into())
        }
    }
}
