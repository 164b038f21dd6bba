use async_trait::async_trait;
use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::{debug, trace, warn};

use asp_core::{ProvisionError, Provisioner};
use asp_model::ServicesRequest;

use crate::{ComposeError, ComposeUiConfig};

/// Longest slice of an error body kept in [`ProvisionError::Remote`].
const MAX_ERROR_BODY: usize = 512;

/// Provisioner that scales a compose service through docker-compose-ui.
#[derive(Debug, Clone)]
pub struct ComposeUiClient {
    http: Client,
    services_url: String,
}

impl ComposeUiClient {
    pub fn new(cfg: &ComposeUiConfig) -> Result<Self, ComposeError> {
        cfg.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            services_url: cfg.services_url(),
        })
    }

    pub fn services_url(&self) -> &str {
        &self.services_url
    }
}

#[async_trait]
impl Provisioner for ComposeUiClient {
    fn name(&self) -> &'static str {
        "compose-ui"
    }

    async fn start_services(&self, request: &ServicesRequest) -> Result<(), ProvisionError> {
        trace!(url = %self.services_url, ?request, "PUT services");

        let response = self
            .http
            .put(&self.services_url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request to {} timed out", self.services_url)
                } else {
                    e.to_string()
                };
                ProvisionError::Transport(reason)
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "compose-ui accepted scale request");
            return Ok(());
        }

        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        warn!(status = status.as_u16(), "compose-ui rejected scale request");

        Err(ProvisionError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}
