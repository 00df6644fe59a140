mod common;

use chrono::{TimeZone, Utc};
use tweetfetch_social::twitter::extract::parse_tweets;
use tweetfetch_social::twitter::model::{MentionEntity, UrlEntity};

#[test]
fn parses_a_timeline_page() {
    let tweets = parse_tweets(&common::fixture("timeline.json")).unwrap();
    assert_eq!(tweets.len(), 1);
    let t = &tweets[0];

    assert_eq!(t.id, "850007368138018817");
    assert_eq!(
        t.text,
        "RT @TwitterDev: 1/ Today we’re sharing our vision for the future of the Twitter API platform!\nhttps://t.co/XweGngmxlP"
    );
    assert_eq!(
        t.created,
        Some(Utc.with_ymd_and_hms(2017, 4, 6, 15, 28, 43).unwrap())
    );
    assert_eq!(
        t.app,
        r#"<a href="http://twitter.com" rel="nofollow">Twitter Web Client</a>"#
    );
    assert_eq!(t.language.as_deref(), Some("en"));
    assert_eq!(t.likes, 0);
    assert_eq!(t.retweets, 284);
    assert!(!t.is_quote);
    assert!(t.is_retweet);
    assert!(!t.is_reply);
    assert_eq!(t.reply_to, None);
    assert_eq!(t.coordinates, None);

    let a = &t.author;
    assert_eq!(a.id, "6253282");
    assert_eq!(a.name, "Twitter API");
    assert_eq!(a.username, "twitterapi");
    assert_eq!(a.location.as_deref(), Some("San Francisco, CA"));
    assert_eq!(a.website.as_deref(), Some("https://dev.twitter.com"));
    assert_eq!(
        a.bio.as_deref(),
        Some("The Real Twitter API. I tweet about API changes, service issues and happily answer questions about Twitter and our API. Don't get an answer? It's on my website.")
    );
    assert!(a.is_verified);
    assert_eq!(a.followers, 6172353);
    assert_eq!(a.following, 46);
    assert_eq!(
        a.created,
        Some(Utc.with_ymd_and_hms(2007, 5, 23, 6, 1, 13).unwrap())
    );
    assert_eq!(a.number_of_tweets, 3583);
    assert_eq!(a.language.as_deref(), Some("en"));

    assert_eq!(
        t.entities.urls,
        vec!["https://cards.twitter.com/cards/18ce53wgo4h/3xo1c"]
    );
    assert!(t.entities.tags.is_empty());
    assert_eq!(t.entities.mentions, vec!["TwitterDev"]);
    assert!(t.entities.media.is_empty());

    assert_eq!(
        t.full_entities.urls,
        vec![UrlEntity {
            url: "https://t.co/XweGngmxlP".into(),
            expanded_url: "https://cards.twitter.com/cards/18ce53wgo4h/3xo1c".into(),
            display_url: "cards.twitter.com/cards/18ce53wg…".into(),
            indices: [94, 117],
        }]
    );
    assert_eq!(
        t.full_entities.mentions,
        vec![MentionEntity {
            id: "2244994945".into(),
            name: "TwitterDev".into(),
            screen_name: "TwitterDev".into(),
            indices: [3, 14],
        }]
    );
    assert!(t.full_entities.tags.is_empty());
    assert!(t.full_entities.media.is_empty());
}

#[test]
fn parses_a_search_page() {
    let tweets = parse_tweets(&common::fixture("search.json")).unwrap();
    assert_eq!(tweets.len(), 1);
    let t = &tweets[0];

    assert_eq!(t.id, "1376549139132080135");
    assert!(t.text.starts_with("RT @KennethLange: 📢 New Blog Post 📢\n \nThe Functional Core"));
    assert_eq!(
        t.created,
        Some(Utc.with_ymd_and_hms(2021, 3, 29, 14, 57, 44).unwrap())
    );
    assert_eq!(
        t.app,
        r#"<a href="https://about.twitter.com/products/tweetdeck" rel="nofollow">TweetDeck</a>"#
    );
    assert_eq!(t.retweets, 4);
    assert!(t.is_retweet);
    assert!(!t.is_reply);

    let a = &t.author;
    assert_eq!(a.id, "399621704");
    assert_eq!(a.username, "KennethLange");
    assert_eq!(a.website.as_deref(), Some("http://kennethlange.com"));
    assert!(!a.is_verified);
    assert_eq!(a.followers, 5090);
    assert_eq!(a.following, 3365);
    assert_eq!(
        a.created,
        Some(Utc.with_ymd_and_hms(2011, 10, 27, 19, 44, 18).unwrap())
    );
    assert_eq!(a.number_of_tweets, 159);

    assert!(t.entities.urls.is_empty());
    assert_eq!(t.entities.mentions, vec!["KennethLange"]);
    assert_eq!(t.full_entities.mentions[0].indices, [3, 16]);
}

#[test]
fn serializes_with_camel_case_and_skips_absent_members() {
    let tweets = parse_tweets(&common::fixture("timeline.json")).unwrap();
    let v = serde_json::to_value(&tweets[0]).unwrap();

    assert_eq!(v["isRetweet"], true);
    assert_eq!(v["author"]["numberOfTweets"], 3583);
    assert_eq!(v["fullEntities"]["urls"][0]["expandedUrl"], tweets[0].entities.urls[0]);
    assert!(v.get("replyTo").is_none());
    assert!(v.get("coordinates").is_none());
}
