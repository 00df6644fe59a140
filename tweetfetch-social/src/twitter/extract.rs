//! Turn one page of raw v1.1 JSON into [`Tweet`]s.
//!
//! Pure: no I/O, no state. A page is either a bare array of statuses (timeline)
//! or an object wrapping them under `statuses` (search). Records keep the order
//! the API returned them in.
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::twitter::error::{TwitterError, TwitterResult};
use crate::twitter::model::{
    Author, Coordinates, FullEntities, HashtagEntity, MediaEntity, MentionEntity, ReplyTo, Tweet,
    UrlEntity,
};
use crate::twitter::types::{RawEntities, RawStatus, RawUser};

/// `Thu Apr 06 15:28:43 +0000 2017`
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a response body into normalized tweets.
///
/// ```
/// use tweetfetch_social::twitter::extract::parse_tweets;
///
/// let page = r#"{"statuses":[{"id_str":"42","full_text":"hi",
///                "user":{"id_str":"7","screen_name":"someone"}}]}"#;
/// let tweets = parse_tweets(page).unwrap();
/// assert_eq!(tweets[0].id, "42");
/// assert_eq!(tweets[0].likes, 0);
/// assert!(tweets[0].entities.urls.is_empty());
/// ```
pub fn parse_tweets(json: &str) -> TwitterResult<Vec<Tweet>> {
    let value: Value = serde_json::from_str(json)?;
    let statuses = match value {
        Value::Object(mut obj) => obj.remove("statuses").ok_or_else(|| {
            TwitterError::Parse("expected a status array or an object with `statuses`".into())
        })?,
        other => other,
    };
    let raw: Vec<RawStatus> = serde_json::from_value(statuses)?;
    Ok(raw.into_iter().map(normalize_status).collect())
}

/// Map one raw status onto the domain shape.
pub fn normalize_status(raw: RawStatus) -> Tweet {
    let reply_to = raw.in_reply_to_status_id.as_ref().map(|_| ReplyTo {
        tweet_id: raw
            .in_reply_to_status_id_str
            .clone()
            .unwrap_or_else(|| "0".to_string()),
        user_id: raw
            .in_reply_to_user_id_str
            .clone()
            .unwrap_or_else(|| "0".to_string()),
        username: raw.in_reply_to_screen_name.clone().unwrap_or_default(),
    });

    let full_entities = full_entities(raw.entities.unwrap_or_default());

    Tweet {
        id: raw.id_str,
        text: raw.full_text.or(raw.text).unwrap_or_default(),
        created: raw.created_at.as_deref().and_then(parse_created_at),
        app: raw.source.unwrap_or_default(),
        language: raw.lang,
        likes: raw.favorite_count.unwrap_or(0),
        retweets: raw.retweet_count.unwrap_or(0),
        is_quote: raw.is_quote_status.unwrap_or(false),
        is_retweet: raw.retweeted_status.is_some(),
        is_reply: reply_to.is_some(),
        reply_to,
        coordinates: raw.coordinates.as_ref().and_then(coordinates),
        author: author(raw.user),
        entities: full_entities.flatten(),
        full_entities,
    }
}

fn author(user: RawUser) -> Author {
    let expanded = user
        .entities
        .as_ref()
        .and_then(|e| e.url.as_ref())
        .and_then(|group| group.urls.as_ref()?.first())
        .and_then(|u| u.expanded_url.clone());
    let website = user
        .url
        .filter(|short| !short.is_empty())
        .map(|short| expanded.unwrap_or(short));

    Author {
        id: user.id_str,
        name: user.name.unwrap_or_default(),
        username: user.screen_name,
        location: user.location,
        website,
        bio: user.description,
        is_verified: user.verified.unwrap_or(false),
        followers: user.followers_count.unwrap_or(0),
        following: user.friends_count.unwrap_or(0),
        created: user.created_at.as_deref().and_then(parse_created_at),
        number_of_tweets: user.statuses_count.unwrap_or(0),
        language: user.lang,
    }
}

fn full_entities(raw: RawEntities) -> FullEntities {
    let urls = raw
        .urls
        .unwrap_or_default()
        .into_iter()
        .map(|u| {
            let url = u.url.unwrap_or_default();
            UrlEntity {
                expanded_url: u.expanded_url.unwrap_or_else(|| url.clone()),
                display_url: u.display_url.unwrap_or_default(),
                indices: u.indices.unwrap_or_default(),
                url,
            }
        })
        .collect();

    let tags = raw
        .hashtags
        .unwrap_or_default()
        .into_iter()
        .map(|h| HashtagEntity {
            text: h.text.unwrap_or_default(),
            indices: h.indices.unwrap_or_default(),
        })
        .collect();

    let mentions = raw
        .user_mentions
        .unwrap_or_default()
        .into_iter()
        .map(|m| MentionEntity {
            id: m.id_str.unwrap_or_default(),
            name: m.name.unwrap_or_default(),
            screen_name: m.screen_name.unwrap_or_default(),
            indices: m.indices.unwrap_or_default(),
        })
        .collect();

    let media = raw
        .media
        .unwrap_or_default()
        .into_iter()
        .map(|m| MediaEntity {
            id: m.id_str.unwrap_or_default(),
            display_url: m.display_url.unwrap_or_default(),
            expanded_url: m.expanded_url.unwrap_or_default(),
            indices: m.indices.unwrap_or_default(),
            media_url: m.media_url.or(m.media_url_https).unwrap_or_default(),
            kind: m.kind.unwrap_or_default(),
        })
        .collect();

    FullEntities {
        urls,
        tags,
        mentions,
        media,
    }
}

fn coordinates(value: &Value) -> Option<Coordinates> {
    let pair = match value {
        Value::Object(obj) => obj.get("coordinates")?,
        other => other,
    };
    match pair.as_array()?.as_slice() {
        [lon, lat, ..] => Some(Coordinates {
            longitude: lon.as_f64()?,
            latitude: lat.as_f64()?,
        }),
        _ => None,
    }
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_str(raw, CREATED_AT_FORMAT) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::trace!(created_at = raw, error = %e, "twitter.extract.bad_timestamp");
            None
        }
    }
}
