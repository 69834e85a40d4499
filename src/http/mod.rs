//! Request execution core: building, sending with retries, and classifying
//! responses.

pub mod classify;
mod request;
mod retry;
mod transport;

pub use request::{API_KEY_PARAM, Method, Request, RequestBuilder};
pub use retry::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_WAIT_MAX, DEFAULT_RETRY_WAIT_MIN, Exchange, RetryPolicy,
    Transport,
};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, TransportError};

#[cfg(test)]
pub(crate) use transport::MockHttpTransport;
