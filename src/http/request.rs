//! Construction of authenticated requests.
//!
//! Building a request performs no I/O. The credential is appended to every
//! URL as the `api-key` query parameter, and only POST and PUT carry a JSON
//! body.

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Query parameter that carries the API key.
pub const API_KEY_PARAM: &str = "api-key";

const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One logical call, ready for the transport.
#[derive(Debug, Clone)]
pub struct Request {
    /// Human-readable operation name, used to give errors context.
    pub operation: &'static str,
    pub method: Method,
    /// API path relative to the base URL, e.g. `/assets`.
    pub path: String,
    /// Absolute URL including the `api-key` query parameter.
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Builds [`Request`] values against one base URL and credential.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a str, api_key: &'a str) -> Self {
        Self { base_url, api_key }
    }

    pub fn get(&self, operation: &'static str, path: &str) -> Result<Request> {
        self.bodiless(operation, Method::Get, path)
    }

    pub fn delete(&self, operation: &'static str, path: &str) -> Result<Request> {
        self.bodiless(operation, Method::Delete, path)
    }

    pub fn post<P: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        payload: &P,
    ) -> Result<Request> {
        self.with_json(operation, Method::Post, path, payload)
    }

    pub fn put<P: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        payload: &P,
    ) -> Result<Request> {
        self.with_json(operation, Method::Put, path, payload)
    }

    /// `<base><path>?api-key=<credential>`
    pub fn url(&self, operation: &'static str, path: &str) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, path))
            .map_err(|source| Error::InvalidUrl { operation, source })?;
        url.query_pairs_mut().append_pair(API_KEY_PARAM, self.api_key);
        Ok(url)
    }

    fn bodiless(&self, operation: &'static str, method: Method, path: &str) -> Result<Request> {
        Ok(Request {
            operation,
            method,
            path: path.to_string(),
            url: self.url(operation, path)?,
            headers: Vec::new(),
            body: None,
        })
    }

    fn with_json<P: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        payload: &P,
    ) -> Result<Request> {
        let body = serde_json::to_vec(payload).map_err(|source| Error::Encode { operation, source })?;
        Ok(Request {
            operation,
            method,
            path: path.to_string(),
            url: self.url(operation, path)?,
            headers: vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())],
            body: Some(body),
        })
    }
}
