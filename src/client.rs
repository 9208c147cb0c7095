//! Blocking HTTP client for the FCM legacy send endpoint
//!
//! Each send operation is one synchronous request/response exchange; batch
//! sends issue their chunked requests strictly sequentially. The client holds
//! no mutable state beyond the immutable credential and is reusable across
//! sequential calls. There is no retry, backoff, or rate limiting; recovery
//! policy belongs to the caller.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{FcmError, FcmResult};
use crate::message::{FcmMessage, Target, MAX_REG_TOKENS};
use crate::response::{FcmResponse, SendOutcome};

/// Production endpoint of the FCM legacy HTTP API
pub const FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// Client for the FCM legacy send API
///
/// Holds the server key set at construction; the credential is immutable
/// thereafter. No request timeout is configured, so timeout behavior is
/// whatever the transport defaults to.
pub struct FcmClient {
    client: Client,
    endpoint: Url,
    auth_header: HeaderValue,
}

impl FcmClient {
    /// Create a client against the production FCM endpoint
    pub fn new(server_key: &str) -> FcmResult<Self> {
        Self::with_endpoint(server_key, FCM_ENDPOINT)
    }

    /// Create a client against a custom endpoint URL
    ///
    /// Useful for self-hosted proxies and for pointing tests at a mock
    /// server.
    pub fn with_endpoint(server_key: &str, endpoint: &str) -> FcmResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            FcmError::invalid_argument("endpoint", format!("not a valid URL: {err}"))
        })?;

        let mut auth_header = HeaderValue::from_str(&format!("key={server_key}"))
            .map_err(|_| {
                FcmError::invalid_argument("server_key", "not a valid header value")
            })?;
        auth_header.set_sensitive(true);

        let client = Client::builder()
            .build()
            .map_err(|source| FcmError::ClientBuild { source })?;

        Ok(Self {
            client,
            endpoint,
            auth_header,
        })
    }

    /// Send a message to a list of recipients, chunked at the API maximum
    ///
    /// The list is split into consecutive chunks of at most
    /// [`MAX_REG_TOKENS`] ids; chunk boundaries are positional and the last
    /// chunk may be shorter. One request is issued per chunk, strictly in
    /// order, and the outcomes are returned in the same order. An empty list
    /// issues no requests and returns an empty vec.
    pub fn send(
        &self,
        registration_ids: &[String],
        notification: Option<&Value>,
        data: Option<&Value>,
    ) -> FcmResult<Vec<SendOutcome>> {
        let mut outcomes =
            Vec::with_capacity(registration_ids.len().div_ceil(MAX_REG_TOKENS));

        for chunk in registration_ids.chunks(MAX_REG_TOKENS) {
            let message = FcmMessage::new(
                Target::Batch(chunk.to_vec()),
                notification.cloned(),
                data.cloned(),
            )?;
            outcomes.push(self.send_message(&message)?);
        }

        Ok(outcomes)
    }

    /// Send a message to a single recipient token
    pub fn send_to(
        &self,
        to: &str,
        notification: Option<&Value>,
        data: Option<&Value>,
    ) -> FcmResult<SendOutcome> {
        let message = FcmMessage::new(
            Target::Single(to.to_string()),
            notification.cloned(),
            data.cloned(),
        )?;
        self.send_message(&message)
    }

    /// Send a caller-built message as one request
    ///
    /// Escape hatch for messages carrying a condition expression or other
    /// fields the convenience methods do not expose.
    pub fn send_message(&self, message: &FcmMessage) -> FcmResult<SendOutcome> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match message.target() {
            Target::Single(_) => debug!("sending fcm message to one recipient"),
            Target::Batch(ids) => {
                debug!(recipients = ids.len(), "sending fcm message batch")
            }
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .json(message)
            .send()
            .map_err(|source| FcmError::http(self.endpoint.as_str(), source))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|source| FcmError::http(self.endpoint.as_str(), source))?;

        if status == StatusCode::OK {
            let reply = serde_json::from_str(&body)
                .map_err(|source| FcmError::ResponseParse { source })?;
            return Ok(SendOutcome::Delivered(FcmResponse::from_reply(
                message, reply,
            )));
        }

        warn!(status = status.as_u16(), "fcm request rejected");
        Ok(SendOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
