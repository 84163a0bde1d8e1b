//! Builds the per-request [`RequestContext`] handed to services.

use std::convert::Infallible;
use std::time::Duration;

use axum::{extract::FromRequestParts, http::request::Parts};
use database::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Deadline budget for one request, installed with `Extension(RequestTimeout(..))`.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

/// Request context taken from the `x-request-id` header (generated when
/// absent) and the [`RequestTimeout`] extension (no deadline when absent).
#[derive(Debug, Clone)]
pub struct RequestCtx(pub RequestContext);

impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut ctx = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(RequestContext::new)
            .unwrap_or_else(RequestContext::background);

        if let Some(RequestTimeout(timeout)) = parts.extensions.get::<RequestTimeout>() {
            ctx = ctx.with_timeout(*timeout);
        }

        Ok(RequestCtx(ctx))
    }
}
