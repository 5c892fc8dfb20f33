//! Purpose: Blocking HTTP client for the FANBOX JSON API.
//! Exports: `FanboxClient`, `query_pairs`, `API_BASE`, `WEB_ORIGIN`.
//! Role: Transport layer feeding raw JSON into the decoder.
//! Invariants: Every request carries the session cookie and the web `Origin` header.
//! Invariants: Endpoints are API-relative paths (`/post.info`) or absolute URLs (`nextUrl`).
//! Invariants: Non-2xx responses map to `ErrorKind` by status; no retries.
#![allow(clippy::result_large_err)]

use crate::core::decode::{Decode, Decoded, decode};
use crate::core::error::{Error, ErrorKind};
use crate::core::field::WebUrl;
use crate::model::response::{
    ApiResponse, BellCountResponse, CommentListResponse, CountResponse, CreatorListResponse,
    CreatorResponse, PaymentListResponse, PlanListResponse, PostInfoResponse,
    PostListCreatorResponse, PostPaginateResponse, TagListResponse,
};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

type ApiResult<T> = Result<T, Error>;

pub const API_BASE: &str = "https://api.fanbox.cc/";
pub const WEB_ORIGIN: &str = "https://www.fanbox.cc";
pub const SESSION_COOKIE: &str = "FANBOXSESSID";

#[derive(Clone)]
pub struct FanboxClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    session_id: String,
    agent: ureq::Agent,
}

impl FanboxClient {
    pub fn new(session_id: impl Into<String>) -> ApiResult<Self> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("session id is empty")
                .with_hint("Pass --session or set FANBOXSESSID."));
        }
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url: normalize_base_url(API_BASE)?,
                session_id,
                agent: ureq::AgentBuilder::new().build(),
            }),
        })
    }

    /// Points the client at another API root (a mirror or a local test server).
    pub fn with_base_url(self, base_url: &str) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                session_id: self.inner.session_id.clone(),
                agent: self.inner.agent.clone(),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            Url::parse(endpoint).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("invalid endpoint url `{endpoint}`"))
                    .with_source(err)
            })?
        } else {
            self.inner
                .base_url
                .join(endpoint.trim_start_matches('/'))
                .map_err(|err| {
                    Error::new(ErrorKind::Usage)
                        .with_message(format!("invalid endpoint `{endpoint}`"))
                        .with_source(err)
                })?
        };
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    /// GETs `endpoint` and returns the raw JSON document.
    pub fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> ApiResult<Value> {
        let url = self.endpoint_url(endpoint, query)?;
        tracing::debug!(url = %url, "GET");
        let response = self
            .inner
            .agent
            .get(url.as_str())
            .set(
                "Cookie",
                &format!("{SESSION_COOKIE}={}", self.inner.session_id),
            )
            .set("Origin", WEB_ORIGIN)
            .set("Accept", "application/json")
            .call();

        match response {
            Ok(resp) => read_json_response(resp),
            Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(code, resp, &url)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Io)
                .with_message(format!("request to {url} failed"))
                .with_source(err)),
        }
    }

    /// GETs `endpoint` and decodes the `{ "body": ... }` envelope.
    pub fn get<B: Decode>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<Decoded<ApiResponse<B>>> {
        let raw = self.get_json(endpoint, query)?;
        decode(raw)
    }

    /// Confirms the session cookie is accepted by the API.
    pub fn verify_session(&self) -> ApiResult<()> {
        match self.get_json("/user.countUnreadMessages", &[]) {
            Ok(_) => Ok(()),
            Err(err) => Err(Error::new(ErrorKind::Permission)
                .with_message("could not connect to the FANBOX API")
                .with_hint("The FANBOXSESSID cookie may be invalid or expired.")
                .with_source(err)),
        }
    }

    pub fn post_paginate_creator(&self, creator_id: &str) -> ApiResult<Decoded<PostPaginateResponse>> {
        self.get("/post.paginateCreator", &[("creatorId", creator_id)])
    }

    pub fn post_list_creator(
        &self,
        creator_id: &str,
        max_published_datetime: &str,
        max_id: &str,
        limit: u32,
    ) -> ApiResult<Decoded<PostListCreatorResponse>> {
        let limit = limit.to_string();
        self.get(
            "/post.listCreator",
            &[
                ("creatorId", creator_id),
                ("maxPublishedDatetime", max_published_datetime),
                ("maxId", max_id),
                ("limit", &limit),
            ],
        )
    }

    /// Fetches one page named by a paginate URL or a `nextUrl`.
    pub fn post_list_page(&self, page_url: &WebUrl) -> ApiResult<Decoded<PostListCreatorResponse>> {
        self.get(page_url.as_str(), &[])
    }

    pub fn post_info(&self, post_id: &str) -> ApiResult<Decoded<PostInfoResponse>> {
        self.get("/post.info", &[("postId", post_id)])
    }

    pub fn post_list_comments(
        &self,
        post_id: &str,
        limit: u32,
    ) -> ApiResult<Decoded<CommentListResponse>> {
        let limit = limit.to_string();
        self.get("/post.listComments", &[("postId", post_id), ("limit", &limit)])
    }

    pub fn creator_get(&self, creator_id: &str) -> ApiResult<Decoded<CreatorResponse>> {
        self.get("/creator.get", &[("creatorId", creator_id)])
    }

    pub fn creator_list_recommended(&self, limit: u32) -> ApiResult<Decoded<CreatorListResponse>> {
        let limit = limit.to_string();
        self.get("/creator.listRecommended", &[("limit", &limit)])
    }

    pub fn creator_list_related(
        &self,
        user_id: &str,
        limit: u32,
    ) -> ApiResult<Decoded<CreatorListResponse>> {
        let limit = limit.to_string();
        self.get(
            "/creator.listRelated",
            &[("userId", user_id), ("limit", &limit), ("method", "diverse")],
        )
    }

    pub fn plan_list_creator(&self, creator_id: &str) -> ApiResult<Decoded<PlanListResponse>> {
        self.get("/plan.listCreator", &[("creatorId", creator_id)])
    }

    pub fn tag_get_featured(&self, creator_id: &str) -> ApiResult<Decoded<TagListResponse>> {
        self.get("/tag.getFeatured", &[("creatorId", creator_id)])
    }

    pub fn bell_count_unread(&self) -> ApiResult<Decoded<BellCountResponse>> {
        self.get("/bell.countUnread", &[])
    }

    pub fn user_count_unread_messages(&self) -> ApiResult<Decoded<CountResponse>> {
        self.get("/user.countUnreadMessages", &[])
    }

    pub fn newsletter_count_unread(&self) -> ApiResult<Decoded<CountResponse>> {
        self.get("/newsletter.countUnread", &[])
    }

    pub fn payment_list_paid(&self) -> ApiResult<Decoded<PaymentListResponse>> {
        self.get("/payment.listPaid", &[])
    }
}

/// Splits the query of a pagination URL into ordered `(key, value)` pairs.
pub fn query_pairs(url: &str) -> ApiResult<Vec<(String, String)>> {
    let url = Url::parse(url).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid pagination url `{url}`"))
            .with_source(err)
    })?;
    Ok(url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}

fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid api base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(
            Error::new(ErrorKind::Usage).with_message("api base url must use http or https scheme")
        );
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn read_json_response(response: ureq::Response) -> ApiResult<Value> {
    let body = response.into_string().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read response body")
            .with_source(err)
    })?;
    serde_json::from_str(&body).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("invalid response json")
            .with_source(err)
    })
}

fn parse_error_response(status: u16, response: ureq::Response, url: &Url) -> Error {
    let body = response.into_string().unwrap_or_default();
    // The API reports failures as `{"error": "general_error"}`.
    let reason = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string));
    let kind = error_kind_from_status(status);
    let message = match reason {
        Some(reason) => format!("{} returned status {status} ({reason})", url.path()),
        None => format!("{} returned status {status}", url.path()),
    };
    let err = Error::new(kind).with_message(message);
    if kind == ErrorKind::Permission {
        return err.with_hint("Check the FANBOXSESSID cookie.");
    }
    err
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::Usage,
        401 | 403 => ErrorKind::Permission,
        404 => ErrorKind::NotFound,
        500..=599 => ErrorKind::Internal,
        _ => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::{FanboxClient, error_kind_from_status, normalize_base_url, query_pairs};
    use crate::core::error::ErrorKind;

    #[test]
    fn relative_endpoints_join_the_api_root() {
        let client = FanboxClient::new("sess").expect("client");
        let url = client
            .endpoint_url("/post.info", &[("postId", "123")])
            .expect("url");
        assert_eq!(url.as_str(), "https://api.fanbox.cc/post.info?postId=123");
    }

    #[test]
    fn absolute_endpoints_keep_their_query() {
        let client = FanboxClient::new("sess").expect("client");
        let next = "https://api.fanbox.cc/post.listCreator?creatorId=mika&maxId=9&limit=10";
        let url = client.endpoint_url(next, &[]).expect("url");
        assert_eq!(url.as_str(), next);
    }

    #[test]
    fn base_url_override_keeps_path_prefix() {
        let client = FanboxClient::new("sess")
            .expect("client")
            .with_base_url("http://127.0.0.1:9000/api")
            .expect("base");
        let url = client.endpoint_url("/bell.countUnread", &[]).expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/bell.countUnread");
    }

    #[test]
    fn empty_session_is_usage_error() {
        let err = FanboxClient::new("  ").err().expect("empty session");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        let err = normalize_base_url("ftp://example.com/").expect_err("scheme");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(error_kind_from_status(401), ErrorKind::Permission);
        assert_eq!(error_kind_from_status(403), ErrorKind::Permission);
        assert_eq!(error_kind_from_status(404), ErrorKind::NotFound);
        assert_eq!(error_kind_from_status(503), ErrorKind::Internal);
        assert_eq!(error_kind_from_status(429), ErrorKind::Io);
    }

    #[test]
    fn query_pairs_preserve_order_and_decode() {
        let pairs = query_pairs(
            "https://api.fanbox.cc/post.listCreator?creatorId=mika&maxPublishedDatetime=2024-01-01%2000%3A00%3A00&limit=10",
        )
        .expect("pairs");
        assert_eq!(
            pairs,
            vec![
                ("creatorId".to_string(), "mika".to_string()),
                (
                    "maxPublishedDatetime".to_string(),
                    "2024-01-01 00:00:00".to_string()
                ),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }
}
