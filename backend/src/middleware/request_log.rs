//! Per-request structured logging.
//!
//! Emits one `info` event per request with method, path, status, latency and
//! the authenticated caller when known. Server errors additionally produce an
//! `error` event carrying the unredacted error message, which never reaches
//! the client. Requests rejected by inner middleware (an oversized body, a
//! broken payload stream) are logged with the error's status and message.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::http::StatusCode;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::inbound::http::auth::CallerId;

/// Middleware logging every request once it completes.
///
/// Wrap it inside [`crate::Trace`] so events carry the trace identifier.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use fintrack::{RequestLog, Trace};
///
/// let app = App::new().wrap(RequestLog).wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            let outcome = fut.await;
            let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let line = RequestLine {
                method: &method,
                path: &path,
                latency_ms,
            };
            match outcome {
                Ok(res) => {
                    let user_id = res
                        .request()
                        .extensions()
                        .get::<CallerId>()
                        .map(|caller| caller.0.to_string());
                    let message = res.response().error().map(ToString::to_string);
                    line.completed(res.status(), user_id.as_deref(), message.as_deref());
                    Ok(res)
                }
                Err(err) => {
                    line.rejected(err.as_response_error().status_code(), &err);
                    Err(err)
                }
            }
        })
    }
}

struct RequestLine<'a> {
    method: &'a str,
    path: &'a str,
    latency_ms: u64,
}

impl RequestLine<'_> {
    fn completed(&self, status: StatusCode, user_id: Option<&str>, error: Option<&str>) {
        let Self {
            method,
            path,
            latency_ms,
        } = *self;
        let user_id = user_id.unwrap_or("-");
        if status.is_server_error() {
            error!(
                method,
                path,
                status = status.as_u16(),
                latency_ms,
                user_id,
                error = error.unwrap_or("-"),
                "request failed"
            );
        }
        info!(
            method,
            path,
            status = status.as_u16(),
            latency_ms,
            user_id,
            "request completed"
        );
    }

    /// Failures raised by inner middleware before any handler produced a
    /// response.
    fn rejected(&self, status: StatusCode, err: &Error) {
        let Self {
            method,
            path,
            latency_ms,
        } = *self;
        if status.is_server_error() {
            error!(method, path, status = status.as_u16(), latency_ms, error = %err, "request failed");
        } else {
            warn!(method, path, status = status.as_u16(), latency_ms, error = %err, "request rejected");
        }
    }
}
