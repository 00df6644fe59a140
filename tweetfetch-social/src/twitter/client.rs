//! Search and timeline fetching over the v1.1 REST API.
//!
//! Both operations share one backwards pagination loop: request a page, normalize
//! it, and if more is wanted ask for everything older than the page's last
//! record via `max_id`. Pages are fetched strictly one after another since each
//! cursor comes from the previous page.
//!
//! The size check runs per page, so the final page is kept whole even when it
//! overshoots `result_size`. Callers that need an exact cap truncate themselves.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tweetfetch_http::{
    HeaderMap, HttpClient, Method, ReqwestTransport, Transport, bearer_header,
};

use crate::twitter::auth::{Authenticator, Credentials};
use crate::twitter::cursor::previous_id;
use crate::twitter::encode::encode_component;
use crate::twitter::error::{TwitterError, TwitterResult};
use crate::twitter::extract::parse_tweets;
use crate::twitter::model::Tweet;

pub const API_BASE: &str = "https://api.twitter.com";
const SEARCH_PATH: &str = "/1.1/search/tweets.json";
const TIMELINE_PATH: &str = "/1.1/statuses/user_timeline.json";

/// Most records the API hands out per page.
pub const MAX_PAGE_SIZE: usize = 200;
pub const DEFAULT_RESULT_SIZE: usize = 200;

/// Which tweets a search favours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Recent,
    Popular,
    Mixed,
}

impl ResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    fn suffix(self) -> &'static str {
        match self {
            Self::Miles => "mi",
            Self::Kilometers => "km",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radius {
    pub size: f64,
    pub unit: DistanceUnit,
}

impl Default for Radius {
    fn default() -> Self {
        Self {
            size: 1.0,
            unit: DistanceUnit::Miles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// One mile when unset.
    #[serde(default)]
    pub radius: Option<Radius>,
}

impl Location {
    /// `lat,lon,<size><mi|km>`
    fn geocode(&self) -> String {
        let radius = self.radius.unwrap_or_default();
        format!(
            "{},{},{}{}",
            encode_component(&self.latitude.to_string()),
            encode_component(&self.longitude.to_string()),
            radius.size,
            radius.unit.suffix()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Free text, e.g. `California` or `#rustlang`.
    pub query: Option<String>,
    pub location: Option<Location>,
    pub result_type: ResultType,
    pub result_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: None,
            location: None,
            result_type: ResultType::default(),
            result_size: DEFAULT_RESULT_SIZE,
        }
    }
}

impl SearchOptions {
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            query: Some(q.into()),
            ..Default::default()
        }
    }

    fn path(&self, max_id: Option<&str>) -> String {
        let mut path = format!("{SEARCH_PATH}?tweet_mode=extended");
        if let Some(q) = &self.query {
            path.push_str(&format!("&q={}", encode_component(q)));
        }
        path.push_str(&format!("&result_type={}", self.result_type.as_str()));
        path.push_str(&format!("&count={}", page_size(self.result_size)));
        if let Some(id) = max_id {
            path.push_str(&format!("&max_id={}", encode_component(id)));
        }
        if let Some(location) = &self.location {
            path.push_str(&format!("&geocode={}", location.geocode()));
        }
        path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Handle without the `@`, e.g. `kennethlange`.
    pub username: String,
    pub result_size: usize,
}

impl TimelineOptions {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            result_size: DEFAULT_RESULT_SIZE,
        }
    }

    fn path(&self, max_id: Option<&str>) -> String {
        let mut path = format!(
            "{TIMELINE_PATH}?screen_name={}&tweet_mode=extended",
            encode_component(&self.username)
        );
        if let Some(id) = max_id {
            path.push_str(&format!("&max_id={}", encode_component(id)));
        }
        path.push_str(&format!("&count={}", page_size(self.result_size)));
        path
    }
}

fn page_size(result_size: usize) -> usize {
    result_size.min(MAX_PAGE_SIZE)
}

/// Application-authenticated client. Clones share the cached token.
#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    auth: Arc<Authenticator>,
}

impl fmt::Debug for TwitterApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterApi")
            .field("user_agent", &self.http.user_agent())
            .field("has_token", &self.auth.has_token())
            .finish()
    }
}

impl TwitterApi {
    /// Client against the public API host.
    ///
    /// ```
    /// use tweetfetch_social::twitter::{Credentials, TwitterApi, TwitterError};
    ///
    /// let err = TwitterApi::new(Credentials::new("", "secret")).unwrap_err();
    /// assert!(matches!(err, TwitterError::Configuration(_)));
    /// ```
    pub fn new(credentials: Credentials) -> TwitterResult<Self> {
        credentials.validate()?;
        let transport =
            ReqwestTransport::new(API_BASE).map_err(|e| TwitterError::Transport(e.to_string()))?;
        Self::with_transport(credentials, Arc::new(transport))
    }

    pub fn with_transport(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> TwitterResult<Self> {
        Self::with_http(credentials, HttpClient::new(transport))
    }

    pub fn with_http(credentials: Credentials, http: HttpClient) -> TwitterResult<Self> {
        let auth = Authenticator::new(credentials, http.clone())?;
        Ok(Self {
            http,
            auth: Arc::new(auth),
        })
    }

    /// Search recent tweets, newest first.
    pub async fn fetch_by_search(&self, opts: SearchOptions) -> TwitterResult<Vec<Tweet>> {
        self.paginate("search", opts.result_size, |max_id| opts.path(max_id))
            .await
    }

    /// A user's own timeline, newest first.
    pub async fn fetch_by_user(&self, opts: TimelineOptions) -> TwitterResult<Vec<Tweet>> {
        if opts.username.trim().is_empty() {
            return Err(TwitterError::Configuration("username is mandatory".into()));
        }
        self.paginate("timeline", opts.result_size, |max_id| opts.path(max_id))
            .await
    }

    async fn paginate<F>(
        &self,
        endpoint: &'static str,
        result_size: usize,
        path_for: F,
    ) -> TwitterResult<Vec<Tweet>>
    where
        F: Fn(Option<&str>) -> String,
    {
        let token = self.auth.token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            bearer_header(&token).map_err(|e| TwitterError::Authentication(e.to_string()))?,
        );

        let mut tweets: Vec<Tweet> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let path = path_for(cursor.as_deref());
            let body = self
                .http
                .send(Method::GET, &path, headers.clone(), String::new())
                .await
                .map_err(TwitterError::from_fetch)?;

            let batch = parse_tweets(&body)?;
            let received = batch.len();
            let last_id = batch.last().map(|t| t.id.clone());
            tweets.extend(batch);

            tracing::debug!(
                endpoint,
                page,
                received,
                total = tweets.len(),
                cursor = ?cursor,
                "twitter.page"
            );

            if received == 0 || tweets.len() >= result_size {
                break;
            }

            let Some(last_id) = last_id else { break };
            match previous_id(&last_id) {
                Some(next) => cursor = Some(next),
                None if last_id.bytes().all(|b| b.is_ascii_digit()) => {
                    // id 0: nothing older can exist
                    break;
                }
                None => {
                    return Err(TwitterError::Parse(format!(
                        "status id `{last_id}` is not a decimal number"
                    )));
                }
            }
        }

        tracing::debug!(endpoint, pages = page, total = tweets.len(), "twitter.fetch.done");
        Ok(tweets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::testing::ScriptedTransport;
    use serde_json::json;

    const TOKEN: &str = r#"{"token_type":"bearer","access_token":"AAAA"}"#;

    fn page(ids: &[&str]) -> String {
        let statuses: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id_str": id,
                    "full_text": format!("tweet {id}"),
                    "user": { "id_str": "1", "screen_name": "someone" },
                    "entities": { "urls": [], "hashtags": [], "user_mentions": [] }
                })
            })
            .collect();
        json!(statuses).to_string()
    }

    fn search_page(ids: &[&str]) -> String {
        format!(r#"{{"statuses":{},"search_metadata":{{}}}}"#, page(ids))
    }

    fn api(transport: &Arc<ScriptedTransport>) -> TwitterApi {
        TwitterApi::with_transport(Credentials::new("key", "secret"), transport.clone()).unwrap()
    }

    #[test]
    fn search_path_with_defaults() {
        let opts = SearchOptions::query("test");
        assert_eq!(
            opts.path(None),
            "/1.1/search/tweets.json?tweet_mode=extended&q=test&result_type=recent&count=200"
        );
    }

    #[test]
    fn search_path_with_everything() {
        let opts = SearchOptions {
            query: Some("#rust lang".into()),
            location: Some(Location {
                latitude: 55.654,
                longitude: -12.5,
                radius: Some(Radius {
                    size: 2.5,
                    unit: DistanceUnit::Kilometers,
                }),
            }),
            result_type: ResultType::Popular,
            result_size: 50,
        };
        assert_eq!(
            opts.path(Some("99")),
            "/1.1/search/tweets.json?tweet_mode=extended&q=%23rust%20lang&result_type=popular\
             &count=50&max_id=99&geocode=55.654,-12.5,2.5km"
        );
    }

    #[test]
    fn location_without_radius_means_one_mile() {
        let opts = SearchOptions {
            location: Some(Location {
                latitude: 37.7,
                longitude: -122.4,
                radius: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            opts.path(None),
            "/1.1/search/tweets.json?tweet_mode=extended&result_type=recent&count=200\
             &geocode=37.7,-122.4,1mi"
        );
    }

    #[test]
    fn timeline_path() {
        let mut opts = TimelineOptions::new("kennethlange");
        opts.result_size = 1000;
        assert_eq!(
            opts.path(None),
            "/1.1/statuses/user_timeline.json?screen_name=kennethlange&tweet_mode=extended&count=200"
        );
        assert_eq!(
            opts.path(Some("5")),
            "/1.1/statuses/user_timeline.json?screen_name=kennethlange&tweet_mode=extended\
             &max_id=5&count=200"
        );
    }

    #[tokio::test]
    async fn stops_on_an_empty_page() {
        let p1 = page(&["30", "29"]);
        let p2 = page(&["20", "19"]);
        let p3 = page(&[]);
        let transport = ScriptedTransport::new(vec![
            (200, TOKEN),
            (200, p1.as_str()),
            (200, p2.as_str()),
            (200, p3.as_str()),
        ]);

        let mut opts = TimelineOptions::new("someone");
        opts.result_size = 100;
        let tweets = api(&transport).fetch_by_user(opts).await.unwrap();

        let ids: Vec<_> = tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["30", "29", "20", "19"]);
        // token + three pages, nothing after the empty one
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn cursor_is_last_id_minus_one() {
        let p1 = search_page(&["1234567890999", "1234567890123"]);
        let p2 = search_page(&[]);
        let transport =
            ScriptedTransport::new(vec![(200, TOKEN), (200, p1.as_str()), (200, p2.as_str())]);

        api(&transport)
            .fetch_by_search(SearchOptions::query("rust"))
            .await
            .unwrap();

        let paths = transport.paths();
        assert!(!paths[1].contains("max_id"));
        assert!(
            paths[2].contains("&max_id=1234567890122"),
            "second page path: {}",
            paths[2]
        );
    }

    #[tokio::test]
    async fn stops_at_result_size_keeping_the_whole_last_page() {
        let p1 = page(&["9", "8"]);
        let p2 = page(&["7", "6"]);
        let transport =
            ScriptedTransport::new(vec![(200, TOKEN), (200, p1.as_str()), (200, p2.as_str())]);

        let mut opts = TimelineOptions::new("someone");
        opts.result_size = 3;
        let tweets = api(&transport).fetch_by_user(opts).await.unwrap();

        assert_eq!(tweets.len(), 4);
        assert_eq!(transport.calls(), 3);
        assert!(transport.paths()[1].ends_with("&count=3"));
    }

    #[tokio::test]
    async fn fetch_error_discards_partial_results() {
        let p1 = page(&["9", "8"]);
        let transport = ScriptedTransport::new(vec![
            (200, TOKEN),
            (200, p1.as_str()),
            (500, "Internal Error"),
        ]);

        let mut opts = TimelineOptions::new("someone");
        opts.result_size = 10;
        let err = api(&transport).fetch_by_user(opts).await.unwrap_err();
        assert_eq!(
            err,
            TwitterError::Fetch {
                status: 500,
                body: "Internal Error".into()
            }
        );
    }

    #[tokio::test]
    async fn malformed_page_is_a_parse_error() {
        let transport = ScriptedTransport::new(vec![(200, TOKEN), (200, "<html>")]);
        let err = api(&transport)
            .fetch_by_search(SearchOptions::query("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterError::Parse(_)));
    }

    #[tokio::test]
    async fn non_numeric_cursor_is_a_parse_error() {
        let p1 = page(&["abc"]);
        let transport = ScriptedTransport::new(vec![(200, TOKEN), (200, p1.as_str())]);
        let mut opts = TimelineOptions::new("someone");
        opts.result_size = 5;
        let err = api(&transport).fetch_by_user(opts).await.unwrap_err();
        assert!(matches!(err, TwitterError::Parse(msg) if msg.contains("abc")));
    }

    #[tokio::test]
    async fn token_is_fetched_once_per_client() {
        let p1 = page(&["2"]);
        let p2 = page(&["1"]);
        let transport =
            ScriptedTransport::new(vec![(200, TOKEN), (200, p1.as_str()), (200, p2.as_str())]);
        let api = api(&transport);

        let mut opts = TimelineOptions::new("someone");
        opts.result_size = 1;
        api.fetch_by_user(opts.clone()).await.unwrap();
        api.clone().fetch_by_user(opts).await.unwrap();

        assert_eq!(transport.calls(), 3);
        let page_req = transport.request(2);
        assert_eq!(page_req.method, Method::GET);
        assert_eq!(page_req.headers.get("authorization").unwrap(), "Bearer AAAA");
    }

    #[tokio::test]
    async fn auth_failure_stops_before_any_page() {
        let transport = ScriptedTransport::new(vec![(401, "nope")]);
        let err = api(&transport)
            .fetch_by_search(SearchOptions::query("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterError::Authentication(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn blank_username_is_rejected_up_front() {
        let transport = ScriptedTransport::new(vec![]);
        let err = api(&transport)
            .fetch_by_user(TimelineOptions::new(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterError::Configuration(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn construction_validates_credentials() {
        let transport = ScriptedTransport::new(vec![]);
        let err = TwitterApi::with_transport(Credentials::new("key", ""), transport.clone())
            .unwrap_err();
        assert!(matches!(err, TwitterError::Configuration(_)));
        assert_eq!(transport.calls(), 0);
    }
}
