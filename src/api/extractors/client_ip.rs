use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Client key for rate limiting, taken from the first hop of
/// `X-Forwarded-For`. Requests without the header share a single
/// "anonymous" bucket, which means unproxied clients throttle each
/// other; known limitation of header-derived identity.
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "anonymous".to_string());

        Ok(ClientIp(ip))
    }
}
