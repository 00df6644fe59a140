//! The normalized tweet handed back to callers.
//!
//! Built once per raw status by [`extract`](super::extract) and never changed
//! afterwards. Serializes with camelCase names; optional members are omitted
//! rather than written as `null`.
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::Indices;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    /// Decimal id. Kept as a string: it does not fit every client's number type.
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Posting client as the HTML anchor the API returns.
    pub app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub likes: u64,
    pub retweets: u64,

    pub is_quote: bool,
    pub is_retweet: bool,
    /// Always equal to `reply_to.is_some()`.
    pub is_reply: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    pub author: Author,
    pub entities: Entities,
    pub full_entities: FullEntities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyTo {
    pub tweet_id: String,
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Expanded profile URL when the API maps the short link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub is_verified: bool,
    pub followers: u64,
    pub following: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    pub number_of_tweets: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Flat views over [`FullEntities`], one value per entity in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Entities {
    /// Expanded URLs.
    pub urls: Vec<String>,
    /// Hashtag text without the `#`.
    pub tags: Vec<String>,
    /// Mentioned handles.
    pub mentions: Vec<String>,
    /// Direct media file URLs.
    pub media: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FullEntities {
    pub urls: Vec<UrlEntity>,
    pub tags: Vec<HashtagEntity>,
    pub mentions: Vec<MentionEntity>,
    pub media: Vec<MediaEntity>,
}

impl FullEntities {
    /// Project the convenience arrays. Positions line up 1:1 per category.
    pub fn flatten(&self) -> Entities {
        Entities {
            urls: self.urls.iter().map(|u| u.expanded_url.clone()).collect(),
            tags: self.tags.iter().map(|t| t.text.clone()).collect(),
            mentions: self.mentions.iter().map(|m| m.screen_name.clone()).collect(),
            media: self.media.iter().map(|m| m.media_url.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntity {
    /// The t.co link as it appears in the text; what `indices` points at.
    pub url: String,
    pub expanded_url: String,
    pub display_url: String,
    pub indices: Indices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagEntity {
    pub text: String,
    pub indices: Indices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionEntity {
    pub id: String,
    pub name: String,
    pub screen_name: String,
    pub indices: Indices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntity {
    pub id: String,
    pub display_url: String,
    pub expanded_url: String,
    pub indices: Indices,
    pub media_url: String,
    #[serde(rename = "type")]
    pub kind: String,
}
