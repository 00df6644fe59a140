//! Twitter v1.1 integration surface.
//!
//! [`TwitterApi`] is the entry point. It borrows a bearer token from [`auth`],
//! walks pages in [`client`], and maps each page through [`extract`] into the
//! [`model`] types.
pub mod auth;
pub mod client;
pub mod cursor;
pub mod encode;
pub mod error;
pub mod extract;
pub mod model;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::Credentials;
pub use client::{
    DistanceUnit, Location, Radius, ResultType, SearchOptions, TimelineOptions, TwitterApi,
};
pub use error::{TwitterError, TwitterResult};
pub use model::Tweet;
