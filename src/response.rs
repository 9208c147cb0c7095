//! Parsing of FCM reply bodies into structured responses
//!
//! A structured [`FcmResponse`] is only ever built from a status-200 reply;
//! any other status surfaces the raw body text through
//! [`SendOutcome::Rejected`].

use serde::Deserialize;

use crate::message::{FcmMessage, Target};

/// Per-recipient error markers the remote API reports for bad or stale
/// registration ids. Informational only; never validated by this library.
pub const REGISTRATION_ID_ERRORS: [&str; 3] = [
    "MissingRegistration",
    "InvalidRegistration",
    "NotRegistered",
];

/// One entry of the reply's `results` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryResult {
    /// Identifier of the accepted message
    pub message_id: Option<String>,
    /// Canonical registration id; when present the caller should replace the
    /// token it sent with this one
    pub registration_id: Option<String>,
    /// Error marker reported by the remote API
    pub error: Option<String>,
}

impl DeliveryResult {
    /// Whether the reported error is one of the known registration-id errors
    pub fn is_registration_error(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|err| REGISTRATION_ID_ERRORS.contains(&err))
    }
}

/// Raw JSON shape of a status-200 reply body
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReplyBody {
    pub multicast_id: Option<i64>,
    pub success: Option<u32>,
    pub failure: Option<u32>,
    pub canonical_ids: Option<u32>,
    pub results: Option<Vec<DeliveryResult>>,
}

/// Structured result of one accepted (status 200) send request
#[derive(Debug, Clone)]
pub struct FcmResponse {
    /// Remote identifier for the multicast exchange
    pub multicast_id: Option<i64>,
    /// Number of recipients the message was delivered to
    pub success: Option<u32>,
    /// Number of recipients delivery failed for
    pub failure: Option<u32>,
    /// Number of results carrying a canonical registration id
    pub canonical_ids: Option<u32>,
    /// Recipient tokens zipped positionally with the reply's `results`
    /// entries. Empty when the reply carries no `results` array. A message
    /// that only had a condition-style audience would also leave this empty,
    /// since pairing keys off the token target.
    pub results: Vec<(String, DeliveryResult)>,
}

impl FcmResponse {
    /// Pair a parsed reply body with the message that produced it
    pub(crate) fn from_reply(message: &FcmMessage, reply: ReplyBody) -> Self {
        let results = match (message.target(), reply.results) {
            (Target::Batch(ids), Some(entries)) => {
                ids.iter().cloned().zip(entries).collect()
            }
            (Target::Single(to), Some(entries)) => entries
                .into_iter()
                .next()
                .map(|entry| vec![(to.clone(), entry)])
                .unwrap_or_default(),
            (_, None) => Vec::new(),
        };

        Self {
            multicast_id: reply.multicast_id,
            success: reply.success,
            failure: reply.failure,
            canonical_ids: reply.canonical_ids,
            results,
        }
    }
}

/// Outcome of one HTTP exchange with the FCM endpoint
#[derive(Debug)]
pub enum SendOutcome {
    /// The endpoint answered 200; the body was parsed into a response
    Delivered(FcmResponse),
    /// The endpoint answered with any other status; the body is surfaced as
    /// raw text with no classification
    Rejected { status: u16, body: String },
}

impl SendOutcome {
    /// HTTP status code of the exchange
    pub fn status(&self) -> u16 {
        match self {
            Self::Delivered(_) => 200,
            Self::Rejected { status, .. } => *status,
        }
    }

    /// Whether the endpoint accepted the request
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// The structured response, when the request was accepted
    pub fn response(&self) -> Option<&FcmResponse> {
        match self {
            Self::Delivered(response) => Some(response),
            Self::Rejected { .. } => None,
        }
    }
}
