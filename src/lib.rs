//! Thin client library for the FCM legacy HTTP send API
//!
//! The library batches recipient registration ids, builds JSON request
//! payloads, performs blocking HTTP POST calls with a `key=<server_key>`
//! authorization header, and parses the JSON reply into a structured
//! [`FcmResponse`]. There is no retry, backoff, queueing, or caching; every
//! failure is surfaced immediately and recovery policy belongs to the caller.

pub mod client;
pub mod errors;
pub mod message;
pub mod response;

// Re-export commonly used types for convenience
pub use client::{FcmClient, FCM_ENDPOINT};
pub use errors::{FcmError, FcmResult};
pub use message::{FcmMessage, Target, MAX_REG_TOKENS};
pub use response::{DeliveryResult, FcmResponse, SendOutcome, REGISTRATION_ID_ERRORS};
