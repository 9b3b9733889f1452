//! Input sanitisation middleware.
//!
//! Rewrites every string value of a JSON request body (recursively) and every
//! query parameter value before any extractor runs:
//!
//! 1. trim surrounding whitespace;
//! 2. drop `<script>`, `<style>`, `<iframe>` and `<object>` blocks with their
//!    contents, then any remaining tags or comments;
//! 3. drop `javascript:` scheme prefixes;
//! 4. encode stray `<` and `>` as entities.
//!
//! Non-string JSON values are left alone. Bodies that are not valid JSON pass
//! through untouched so the JSON extractor can reject them.

use std::rc::Rc;
use std::sync::OnceLock;
use std::task::{Context, Poll};

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{CONTENT_LENGTH, HeaderValue};
use actix_web::http::uri::{PathAndQuery, Uri};
use actix_web::{Error, HttpMessage, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

const BLOCK_TAGS: [&str; 4] = ["script", "style", "iframe", "object"];

fn block_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        BLOCK_TAGS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap_or_else(
                    |error| panic!("{tag} block regex failed to compile: {error}"),
                )
            })
            .collect()
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>")
            .unwrap_or_else(|error| panic!("tag regex failed to compile: {error}"))
    })
}

fn script_scheme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)javascript\s*:")
            .unwrap_or_else(|error| panic!("scheme regex failed to compile: {error}"))
    })
}

/// Clean one untrusted string.
///
/// # Examples
/// ```
/// use fintrack::inbound::http::sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("  <script>alert(1)</script>Lunch "), "Lunch");
/// assert_eq!(sanitize_text("1 < 2"), "1 &lt; 2");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.trim().to_owned();
    // Removing one construct can splice the halves of another together.
    loop {
        let mut next = text.clone();
        for block in block_patterns() {
            next = block.replace_all(&next, "").into_owned();
        }
        next = tag_pattern().replace_all(&next, "").into_owned();
        next = script_scheme_pattern().replace_all(&next, "").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    text.replace('<', "&lt;").replace('>', "&gt;").trim().to_owned()
}

/// Sanitise every string inside `value`, in place.
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(text) => *text = sanitize_text(text),
        Value::Array(items) => items.iter_mut().for_each(sanitize_value),
        Value::Object(fields) => fields.values_mut().for_each(sanitize_value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn sanitize_query(query: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key, sanitize_text(&value))),
        )
        .finish()
}

fn is_json(req: &ServiceRequest) -> bool {
    let content_type = req.content_type();
    content_type.eq_ignore_ascii_case("application/json") || content_type.ends_with("+json")
}

fn payload_from(bytes: web::Bytes) -> Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(bytes);
    Payload::from(payload)
}

fn rewrite_query(req: &mut ServiceRequest) {
    let query = req.query_string();
    if query.is_empty() {
        return;
    }
    let cleaned = sanitize_query(query);
    if cleaned == query {
        return;
    }
    let path_and_query = format!("{}?{cleaned}", req.path());
    let mut parts = req.head().uri.clone().into_parts();
    let rebuilt = PathAndQuery::try_from(path_and_query)
        .ok()
        .and_then(|pq| {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).ok()
        });
    match rebuilt {
        Some(uri) => {
            req.match_info_mut().get_mut().update(&uri);
            req.head_mut().uri = uri;
        }
        None => warn!(path = req.path(), "could not rebuild sanitised query string"),
    }
}

async fn rewrite_body(req: &mut ServiceRequest) -> Result<(), Error> {
    if !is_json(req) {
        return Ok(());
    }
    let bytes = req.extract::<web::Bytes>().await?;
    let cleaned = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            sanitize_value(&mut value);
            match serde_json::to_vec(&value) {
                Ok(encoded) => web::Bytes::from(encoded),
                Err(error) => {
                    warn!(%error, "failed to re-encode sanitised body");
                    bytes
                }
            }
        }
        Err(_) => {
            debug!("leaving unparseable JSON body for the extractor");
            bytes
        }
    };
    req.headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(cleaned.len()));
    req.set_payload(payload_from(cleaned));
    Ok(())
}

/// Middleware sanitising JSON bodies and query strings.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use fintrack::inbound::http::sanitize::Sanitize;
///
/// let app = App::new().wrap(Sanitize);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitize;

impl<S, B> Transform<S, ServiceRequest> for Sanitize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SanitizeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SanitizeMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`Sanitize`].
pub struct SanitizeMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SanitizeMiddleware<S>
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

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            rewrite_query(&mut req);
            rewrite_body(&mut req).await?;
            service.call(req).await
        })
    }
}
