//! Request-scoped values shared between the observability middleware and handlers.

use axum::{
    extract::{FromRequestParts, MatchedPath},
    http::{Extensions, HeaderMap, Method, Request, request::Parts},
};
use std::convert::Infallible;
use strum::{Display, IntoStaticStr};

/// Primary inbound correlation header. Header names are case-insensitive, so
/// this also matches `requestId`.
pub const REQUEST_ID_HEADER: &str = "requestid";

/// Conventional correlation header used when `requestId` is absent.
pub const FALLBACK_REQUEST_ID_HEADER: &str = "x-request-id";

/// Route label for requests no route matched. Keeps raw paths out of metric labels.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Per-request identity carried from the middleware into handlers and services.
///
/// The middleware builds it once and stores it in the request extensions.
/// Handlers take it as an extractor and pass it down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Inbound `requestId` (or `x-request-id`); empty when the caller sent none.
    pub request_id: String,
    pub method: String,
    /// Route template when matched (`/locations/{id}`), [`UNMATCHED_ROUTE`] otherwise.
    pub route: String,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            method: method.into(),
            route: route.into(),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::build(request.method(), request.headers(), request.extensions())
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::build(&parts.method, &parts.headers, &parts.extensions)
    }

    fn build(method: &Method, headers: &HeaderMap, extensions: &Extensions) -> Self {
        let route = extensions
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

        Self {
            request_id: request_id_from_headers(headers),
            method: method.to_string(),
            route,
        }
    }
}

/// Reads the correlation id, preferring `requestId` over `x-request-id`.
/// Values that are not valid visible ASCII are ignored.
pub fn request_id_from_headers(headers: &HeaderMap) -> String {
    [REQUEST_ID_HEADER, FALLBACK_REQUEST_ID_HEADER]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::from_parts(parts)))
    }
}

/// Name of the domain operation a handler performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    List,
    Get,
    Create,
    Upsert,
    Delete,
}

/// What a handler did or attempted, returned to the middleware as a response
/// extension on success and failure alike, and logged as the request's
/// `payload` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub operation: Operation,
    pub resource_id: Option<String>,
}

impl OperationRecord {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            resource_id: None,
        }
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }
}
