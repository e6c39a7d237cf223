//! HTTP client for the pinning endpoint.

use bytes::Bytes;
use hawser_types::ContentId;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::PinningService;
use crate::error::NetError;

/// Upload response body. Only the identifier is read; other fields the
/// endpoint returns are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddResponse {
    pub(crate) content_identifier: String,
}

/// Pinning endpoint client over HTTP.
///
/// Uploads POST the raw payload to the endpoint with the caller's bearer
/// credential. Pin management POSTs or DELETEs `pins/<id>` with the
/// account token given at construction.
pub struct HttpPinningService {
    client: reqwest::Client,
    endpoint: Url,
    account_token: String,
}

impl HttpPinningService {
    pub fn new(endpoint: Url, account_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            account_token: account_token.into(),
        }
    }

    fn pin_url(&self, id: &ContentId) -> String {
        format!(
            "{}/pins/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            id
        )
    }
}

#[async_trait::async_trait]
impl PinningService for HttpPinningService {
    async fn add(&self, payload: Bytes, credential: &str) -> Result<ContentId, NetError> {
        let size = payload.len();
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(credential)
            .body(payload)
            .send()
            .await
            .map_err(|e| NetError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::UploadFailed(format!(
                "pinning endpoint returned status {status}"
            )));
        }

        let body: AddResponse = response
            .json()
            .await
            .map_err(|e| NetError::InvalidResponse(e.to_string()))?;

        debug!(size, id = %body.content_identifier, "upload accepted");
        Ok(ContentId::from(body.content_identifier))
    }

    async fn pin(&self, id: &ContentId) -> Result<(), NetError> {
        let response = self
            .client
            .post(self.pin_url(id))
            .bearer_auth(&self.account_token)
            .send()
            .await
            .map_err(|e| NetError::PinFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::PinFailed(format!(
                "pin endpoint returned status {status}"
            )));
        }

        debug!(%id, "remote pin confirmed");
        Ok(())
    }

    async fn unpin(&self, id: &ContentId) -> Result<(), NetError> {
        let response = self
            .client
            .delete(self.pin_url(id))
            .bearer_auth(&self.account_token)
            .send()
            .await
            .map_err(|e| NetError::PinFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::PinFailed(format!(
                "unpin endpoint returned status {status}"
            )));
        }

        debug!(%id, "remote pin released");
        Ok(())
    }
}
