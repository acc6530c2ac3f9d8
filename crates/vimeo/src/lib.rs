//! Vimeo integration for the vodify conversion pipeline.
//!
//! - [`client::VimeoClient`] — read-only lookups against the oEmbed and
//!   `/me/videos` APIs, used to locate the raw recording of an event.
//! - [`thumbnail::ThumbnailFetcher`] — downloads and stores the video
//!   thumbnail; implements the core `ThumbnailProvider` trait.

pub mod client;
pub mod thumbnail;

pub use client::{OembedData, VimeoClient, VimeoError, VimeoVideo};
pub use thumbnail::ThumbnailFetcher;
