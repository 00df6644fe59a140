//! Social network clients used by tweetfetch.
//!
//! Only the Twitter v1.1 pipeline is implemented: application-only auth, backwards
//! pagination over search and user timelines, and normalization into [`twitter::Tweet`].
pub mod twitter;
