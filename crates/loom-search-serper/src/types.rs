// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Types for Serper.dev API.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Queries longer than this many characters are truncated before sending.
pub const MAX_QUERY_CHARS: usize = 400;

/// Request envelope shared by every search vertical.
///
/// Optional fields at their empty value (`""`, `false`, `0`) are left out of
/// the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	#[serde(rename = "q")]
	pub query: String,

	/// Country code, e.g. `us`.
	#[serde(rename = "gl", default, skip_serializing_if = "is_blank")]
	pub country: Option<String>,

	/// Free-text location, e.g. `Austin, Texas`.
	#[serde(default, skip_serializing_if = "is_blank")]
	pub location: Option<String>,

	/// Interface language code, e.g. `en`.
	#[serde(rename = "hl", default, skip_serializing_if = "is_blank")]
	pub language: Option<String>,

	#[serde(default, skip_serializing_if = "is_unset_flag")]
	pub autocorrect: Option<bool>,

	/// Results per page.
	#[serde(default, skip_serializing_if = "is_unset_count")]
	pub num: Option<u32>,

	#[serde(default, skip_serializing_if = "is_unset_count")]
	pub page: Option<u32>,
}

fn is_blank(value: &Option<String>) -> bool {
	value.as_deref().map_or(true, str::is_empty)
}

fn is_unset_flag(value: &Option<bool>) -> bool {
	!value.unwrap_or(false)
}

fn is_unset_count(value: &Option<u32>) -> bool {
	value.unwrap_or(0) == 0
}

/// Reads an explicit `null` as the type's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			..Default::default()
		}
	}

	pub fn with_country(mut self, country: impl Into<String>) -> Self {
		self.country = Some(country.into());
		self
	}

	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	pub fn with_autocorrect(mut self, autocorrect: bool) -> Self {
		self.autocorrect = Some(autocorrect);
		self
	}

	pub fn with_num(mut self, num: u32) -> Self {
		self.num = Some(num);
		self
	}

	pub fn with_page(mut self, page: u32) -> Self {
		self.page = Some(page);
		self
	}

	/// Length of the query in characters.
	pub fn query_chars(&self) -> usize {
		self.query.chars().count()
	}

	/// Returns the request as it goes on the wire: borrowed when the query
	/// fits in [`MAX_QUERY_CHARS`], otherwise a copy holding the first
	/// [`MAX_QUERY_CHARS`] characters of the query.
	pub fn normalized(&self) -> Cow<'_, SearchRequest> {
		match self.query.char_indices().nth(MAX_QUERY_CHARS) {
			Some((cut, _)) => {
				let mut truncated = self.clone();
				truncated.query.truncate(cut);
				Cow::Owned(truncated)
			}
			None => Cow::Borrowed(self),
		}
	}
}

/// Echo of the parameters the upstream used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
	#[serde(rename = "q", default, deserialize_with = "null_as_default")]
	pub query: String,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub engine: Option<String>,
}

/// Response from the web (`/search`) vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub organic: Vec<SearchResult>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub knowledge_graph: Option<KnowledgeGraph>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub answer_box: Option<AnswerBox>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub people_also_ask: Vec<PeopleAlsoAsk>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub related_searches: Vec<RelatedSearch>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub top_stories: Vec<TopStory>,
}

/// A single organic web result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	#[serde(default, deserialize_with = "null_as_default")]
	pub title: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub link: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub position: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub sitelinks: Vec<Sitelink>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sitelink {
	#[serde(default, deserialize_with = "null_as_default")]
	pub title: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGraph {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description_source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description_link: Option<String>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerBox {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub answer: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeopleAlsoAsk {
	#[serde(default, deserialize_with = "null_as_default")]
	pub question: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedSearch {
	#[serde(default, deserialize_with = "null_as_default")]
	pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopStory {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

/// Response from the `/images` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub images: Vec<ImageResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub image_url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_height: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_height: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub google_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
}

/// Response from the `/videos` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub videos: Vec<VideoResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
}

/// Response from the `/places` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub places: Vec<PlaceResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub longitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating_count: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifier: Option<String>,
}

/// Response from the `/news` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub news: Vec<NewsResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
}

/// Response from the `/shopping` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub shopping: Vec<ShoppingResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating_count: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub offers: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
}

/// Response from the `/scholar` vertical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search_parameters: Option<SearchParameters>,
	#[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
	pub organic: Vec<ScholarResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarResult {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub publication_info: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub snippet: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cited_by: Option<u64>,
}
