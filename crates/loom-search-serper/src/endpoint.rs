// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search verticals and their paths on the Serper host.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::types::{
	ImageResponse, NewsResponse, PlaceResponse, ScholarResponse, SearchResponse, ShoppingResponse,
	VideoResponse,
};

/// A Serper search vertical. All share the request envelope and auth header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
	Web,
	Images,
	Videos,
	Places,
	News,
	Shopping,
	Scholar,
}

impl Endpoint {
	pub const ALL: [Endpoint; 7] = [
		Endpoint::Web,
		Endpoint::Images,
		Endpoint::Videos,
		Endpoint::Places,
		Endpoint::News,
		Endpoint::Shopping,
		Endpoint::Scholar,
	];

	/// Path appended to the base URL.
	pub fn path(self) -> &'static str {
		match self {
			Endpoint::Web => "/search",
			Endpoint::Images => "/images",
			Endpoint::Videos => "/videos",
			Endpoint::Places => "/places",
			Endpoint::News => "/news",
			Endpoint::Shopping => "/shopping",
			Endpoint::Scholar => "/scholar",
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Endpoint::Web => "web",
			Endpoint::Images => "images",
			Endpoint::Videos => "videos",
			Endpoint::Places => "places",
			Endpoint::News => "news",
			Endpoint::Shopping => "shopping",
			Endpoint::Scholar => "scholar",
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A response shape tied to the endpoint that produces it.
pub trait SearchVertical: DeserializeOwned + Send {
	const ENDPOINT: Endpoint;
}

impl SearchVertical for SearchResponse {
	const ENDPOINT: Endpoint = Endpoint::Web;
}

impl SearchVertical for ImageResponse {
	const ENDPOINT: Endpoint = Endpoint::Images;
}

impl SearchVertical for VideoResponse {
	const ENDPOINT: Endpoint = Endpoint::Videos;
}

impl SearchVertical for PlaceResponse {
	const ENDPOINT: Endpoint = Endpoint::Places;
}

impl SearchVertical for NewsResponse {
	const ENDPOINT: Endpoint = Endpoint::News;
}

impl SearchVertical for ShoppingResponse {
	const ENDPOINT: Endpoint = Endpoint::Shopping;
}

impl SearchVertical for ScholarResponse {
	const ENDPOINT: Endpoint = Endpoint::Scholar;
}
