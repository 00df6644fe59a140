//! Raw v1.1 status and user payloads, exactly as the API sends them.
//!
//! Only `id_str` and the author's `id_str` / `screen_name` are required; every
//! other field is optional here and gets its absence rule in
//! [`extract`](super::extract).
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `[start, end]` character offsets into the status text.
pub type Indices = [u32; 2];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStatus {
    pub id_str: String,

    #[serde(default)]
    pub text: Option<String>,
    /// Present with `tweet_mode=extended`; wins over `text`.
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,

    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub is_quote_status: Option<bool>,

    /// Only its presence matters.
    #[serde(default)]
    pub retweeted_status: Option<Value>,

    /// Numeric on the wire; only its presence matters.
    #[serde(default)]
    pub in_reply_to_status_id: Option<Value>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,

    /// GeoJSON point (`{"type":"Point","coordinates":[lon, lat]}`) or a bare pair.
    #[serde(default)]
    pub coordinates: Option<Value>,

    pub user: RawUser,

    #[serde(default)]
    pub entities: Option<RawEntities>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    pub id_str: String,
    pub screen_name: String,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Usually a t.co short link; see `entities.url`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub friends_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub statuses_count: Option<u64>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub entities: Option<RawUserEntities>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawUserEntities {
    /// Entity mapping for the profile URL.
    #[serde(default)]
    pub url: Option<RawUrlGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawUrlGroup {
    #[serde(default)]
    pub urls: Option<Vec<RawUrl>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawEntities {
    #[serde(default)]
    pub urls: Option<Vec<RawUrl>>,
    #[serde(default)]
    pub hashtags: Option<Vec<RawHashtag>>,
    #[serde(default)]
    pub user_mentions: Option<Vec<RawMention>>,
    /// Absent unless the status carries media.
    #[serde(default)]
    pub media: Option<Vec<RawMedia>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawUrl {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub expanded_url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub indices: Option<Indices>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHashtag {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub indices: Option<Indices>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMention {
    #[serde(default)]
    pub id_str: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub indices: Option<Indices>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMedia {
    #[serde(default)]
    pub id_str: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub expanded_url: Option<String>,
    #[serde(default)]
    pub indices: Option<Indices>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_url_https: Option<String>,
    #[serde(default)]
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
