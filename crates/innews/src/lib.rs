//! Client for the covid19.innews.gr source page.
//!
//! The source embeds its data as JSON literals inside an inline script
//! tag; [`client::InnewsClient`] fetches the page and [`extract::extract`]
//! pulls the four raw tables out of it.

pub mod client;
pub mod config;
pub mod extract;

pub use client::InnewsClient;
pub use config::UpstreamConfig;
pub use extract::extract;
