//! Crossref Module
//!
//! Talks to the Crossref REST API (`https://api.crossref.org`):
//! - `GET /works?query=...` to resolve a free-text title to candidate works
//! - `GET /works/{doi}` to read the bibliography of one work
//!
//! The wire records below mirror Crossref's JSON loosely: every field is
//! optional, and normalization into display-ready shapes happens once in
//! [`crate::models`].

pub mod client;

pub use client::CrossrefClient;

use crate::types::AppResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Source of works and their reference lists.
///
/// The tree builder only depends on this trait, so a session can run against
/// the live API or an in-memory fake.
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Return up to `rows` candidate works for a free-text query, best match first
    async fn search_works(&self, query: &str, rows: usize) -> AppResult<Vec<WorkItem>>;

    /// Return the raw reference list of the work identified by `doi`
    async fn fetch_references(&self, doi: &str) -> AppResult<Vec<RawReference>>;
}

/// `{ "status": ..., "message": ... }` wrapper around every Crossref payload
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub message: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WorkList {
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<WorkItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WorkDetail {
    #[serde(default, deserialize_with = "lenient_list")]
    pub reference: Vec<RawReference>,
}

/// A search hit, restricted to the fields requested via `select=`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(rename = "DOI", default, deserialize_with = "lenient_text")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient_texts")]
    pub title: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub author: Vec<RawAuthor>,
    #[serde(rename = "published-print", default, deserialize_with = "lenient")]
    pub published_print: Option<PartialDate>,
    #[serde(rename = "container-title", default, deserialize_with = "lenient_texts")]
    pub container_title: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "lenient_text")]
    pub given: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub family: Option<String>,
    /// Organizational authors carry a single `name` instead of given/family
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDate {
    #[serde(rename = "date-parts", alias = "dateParts", default)]
    pub date_parts: Vec<Vec<Option<i64>>>,
}

impl PartialDate {
    /// First component of the first date, if present
    pub fn year(&self) -> Option<i32> {
        self.date_parts
            .first()
            .and_then(|parts| parts.first().copied().flatten())
            .and_then(|y| i32::try_from(y).ok())
    }
}

/// One entry of a work's `reference` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReference {
    #[serde(rename = "DOI", default, deserialize_with = "lenient_text")]
    pub doi: Option<String>,
    #[serde(rename = "article-title", default, deserialize_with = "lenient_text")]
    pub article_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Crossref deposits only the first author here, as free text
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(rename = "journal-title", default, deserialize_with = "lenient_text")]
    pub journal_title: Option<String>,
    #[serde(rename = "container-title", default, deserialize_with = "lenient_text")]
    pub container_title: Option<String>,
    /// Usually `"2017"`, sometimes deposited as a bare number
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(rename = "published-print", default, deserialize_with = "lenient")]
    pub published_print: Option<PartialDate>,
}

// Field-level decoding never fails the whole payload: a mistyped field
// decodes as absent, a mistyped list element is skipped.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_of))
}

/// Crossref titles are arrays of strings; a bare string is accepted too
fn lenient_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(text_of).collect(),
        Some(other) => text_of(other).into_iter().collect(),
        None => Vec::new(),
    })
}
