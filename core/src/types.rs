//! Domain types exchanged with the pet-identification backend.
//!
//! # Design
//! Wire names follow the backend (`dog_img_url`, `nose_features`); Rust
//! names are spelled out. Fields the backend may omit or send as `null`
//! degrade to empty values instead of failing the parse. Only `uid` is
//! mandatory, since nothing can be displayed or deleted without it.
//! The mock-server crate defines its own copies of these shapes, and the
//! integration tests catch any drift between the two.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Local handle to the image bytes a user picked or captured.
///
/// Cheap to clone; the bytes are only read when a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Breed and nose-feature analysis of a freshly registered dog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nose_features: Vec<String>,
    #[serde(rename = "dog_img_url", default, deserialize_with = "null_as_default")]
    pub dog_image_url: String,
    #[serde(rename = "nose_img_url", default, deserialize_with = "null_as_default")]
    pub nose_image_url: String,
}

/// Registered dogs whose nose print matched the query image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: BTreeSet<String>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// A registered dog as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogRecord {
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species: String,
    #[serde(rename = "dog_img_url", default, deserialize_with = "null_as_default")]
    pub dog_image_url: String,
    #[serde(rename = "nose_img_url", default, deserialize_with = "null_as_default")]
    pub nose_image_url: String,
}

/// Outcome of the find flow: the matched uids and the records they resolve
/// to in the current listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindResult {
    pub matches: MatchResult,
    pub dogs: Vec<DogRecord>,
}

impl FindResult {
    /// Selects the "no results" branch of the find screen. Decided by the
    /// resolved records: the backend can still match uids that are no
    /// longer listed.
    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }
}

/// Keep the listing order, drop dogs that did not match.
pub fn resolve_matches(matches: &MatchResult, listing: Vec<DogRecord>) -> Vec<DogRecord> {
    listing
        .into_iter()
        .filter(|dog| matches.matches.contains(&dog.uid))
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
