// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Serper.dev Google Search API client for Loom.
//!
//! This crate provides a typed Rust client for the Serper.dev API covering the
//! web, images, videos, places, news, shopping and scholar verticals. Each
//! call runs under a retry policy and a total deadline spanning every attempt.
//!
//! ```no_run
//! use loom_search_serper::{SearchRequest, SerperClient};
//!
//! # async fn run() -> Result<(), loom_search_serper::SerperError> {
//! let client = SerperClient::from_env()?;
//! let response = client
//! 	.search(SearchRequest::new("rust async").with_country("us").with_num(10))
//! 	.await?;
//! for result in response.organic {
//! 	println!("{} {}", result.position, result.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::SerperClient;
pub use config::{ApiKey, ConfigError, SerperConfig, SerperConfigBuilder};
pub use endpoint::{Endpoint, SearchVertical};
pub use error::{ErrorKind, SerperError};
pub use executor::RequestExecutor;
pub use loom_common_http::{Logger, NoopLogger, RetryConfig, TracingLogger};
pub use types::{
	AnswerBox, ImageResponse, ImageResult, KnowledgeGraph, NewsResponse, NewsResult,
	PeopleAlsoAsk, PlaceResponse, PlaceResult, RelatedSearch, ScholarResponse, ScholarResult,
	SearchParameters, SearchRequest, SearchResponse, SearchResult, ShoppingResponse,
	ShoppingResult, Sitelink, TopStory, VideoResponse, VideoResult, MAX_QUERY_CHARS,
};
