use reqwest::{header::HeaderMap, Method, RequestBuilder};
use serde::de::{Deserialize, Deserializer, IgnoredAny};
use serde::Serialize;
use std::borrow::Cow;

/// Data sent along with a request.
pub enum RequestData<T> {
    Empty,
    /// Serialized as a URL-encoded form body.
    Form(T),
    /// Serialized as the JSON request body.
    Json(T),
    /// Serialized into the query string.
    Query(T),
}

impl<T> Default for RequestData<T> {
    fn default() -> Self {
        RequestData::Empty
    }
}

impl<T: Serialize> RequestData<T> {
    pub(crate) fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            RequestData::Empty => builder,
            RequestData::Form(value) => builder.form(&value),
            RequestData::Json(value) => builder.json(&value),
            RequestData::Query(value) => builder.query(&value),
        }
    }
}

/// An operation against the organization API: where it goes, what it sends and what comes back.
///
/// Any type implementing `Request` can be sent with [`Client::send`](crate::Client::send), which
/// applies the same authentication, retry and fault handling as the built-in operations. Use it
/// for endpoints the convenience methods on `Client` do not cover.
pub trait Request {
    /// The type of additional data sent with the request. Usually, this will be `()` or `Self`.
    type Data: Serialize;
    /// The type of the response from the server.
    type Response: for<'de> Deserialize<'de> + Unpin;
    /// The HTTP method for the request.
    const METHOD: Method = Method::GET;
    /// Whether a bearer token is fetched and attached to the request.
    const AUTHENTICATED: bool = true;
    /// Whether the request is safe to repeat. Requests that are not idempotent bypass the
    /// retrying transport, and so do POST requests whatever this says.
    const IDEMPOTENT: bool = true;

    /// Endpoint relative to the API base path, e.g. `organizations/2`.
    fn endpoint(&self) -> Cow<str>;

    /// Extra headers. The authorization header is set by the client.
    fn headers(&self) -> HeaderMap {
        Default::default()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        Default::default()
    }
}

/// Response type for endpoints whose body carries nothing of interest.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EmptyResponse;

impl<'de> Deserialize<'de> for EmptyResponse {
    fn deserialize<D>(deserializer: D) -> Result<EmptyResponse, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(EmptyResponse)
    }
}
