//! Bearer token authentication for HTTP handlers.
//!
//! Handlers that take an [`AuthenticatedUser`] only run once the
//! `Authorization: Bearer <token>` header resolves to a live session.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionToken, UserId};

use super::state::HttpState;

/// Identity of the caller, stored in request extensions for request logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

/// Caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Authenticated user.
    pub user_id: UserId,
    /// Token presented with the request.
    pub token: SessionToken,
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token is rejected.
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_bearer)
                .map(SessionToken::from_presented)
                .ok_or_else(|| Error::unauthorized("missing bearer token"))?;

            let user_id = state.accounts.authenticate(&token).await?;
            req.extensions_mut().insert(CallerId(user_id));
            Ok(Self { user_id, token })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc123", Some("abc123"))]
    #[case("bearer   abc123  ", Some("abc123"))]
    #[case("Basic abc123", None)]
    #[case("Bearer ", None)]
    #[case("abc123", None)]
    fn parses_bearer_headers(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_bearer(header), expected);
    }
}
