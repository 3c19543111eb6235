//! FHIR Bundle model
//!
//! A Bundle is generic over the shape of the resources in its entries and
//! defaults to the open [`Resource`] envelope.

use crate::error::{Error, Result};
use crate::resource::{BundleResourceType, FhirResource, Resource};
use fhirkit_package::{open_record, ExtensionMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// FHIR Bundle resource
///
/// A container for a collection of resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<T = Resource> {
    /// Resource type - always "Bundle"
    pub resource_type: BundleResourceType,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Indicates the purpose of this bundle (searchset, transaction, ...)
    #[serde(rename = "type")]
    pub bundle_type: String,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Links related to this Bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<BundleLink>>,

    /// Entry in the bundle - will have a resource or information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry<T>>>,

    /// Additional content beyond core fields
    #[serde(flatten, serialize_with = "serialize_bundle_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl<T> for Bundle<T>,
    serialize = serialize_bundle_extra,
    reserved = ["resourceType", "id", "type", "total", "link", "entry"],
);

/// Links related to this Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleLink {
    /// See http://www.iana.org/assignments/link-relations/link-relations.xhtml#link-relations-1
    pub relation: String,

    /// Reference details for the link
    pub url: String,

    #[serde(flatten, serialize_with = "serialize_link_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for BundleLink,
    serialize = serialize_link_extra,
    reserved = ["relation", "url"],
);

/// Entry in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry<T = Resource> {
    /// URI for resource (absolute URL server address or URI for UUID/OID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<T>,

    /// Search-related information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BundleEntrySearch>,

    /// Additional execution information (transaction/batch/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleEntryRequest>,

    /// Results of execution (transaction/batch/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BundleEntryResponse>,

    #[serde(flatten, serialize_with = "serialize_entry_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl<T> for BundleEntry<T>,
    serialize = serialize_entry_extra,
    reserved = ["fullUrl", "resource", "search", "request", "response"],
);

/// Search-related information for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntrySearch {
    /// Why this entry is in the result set (match | include | outcome)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Search ranking (between 0 and 1), kept as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<serde_json::Number>,

    #[serde(flatten, serialize_with = "serialize_search_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for BundleEntrySearch,
    serialize = serialize_search_extra,
    reserved = ["mode", "score"],
);

/// Request details for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntryRequest {
    /// HTTP verb for the entry (GET | POST | PUT | PATCH | DELETE)
    pub method: String,

    /// URL for HTTP equivalent of this entry
    pub url: String,

    #[serde(flatten, serialize_with = "serialize_request_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for BundleEntryRequest,
    serialize = serialize_request_extra,
    reserved = ["method", "url"],
);

/// Response details for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntryResponse {
    /// Status response code (text)
    pub status: String,

    /// The location (if the operation returns a location)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// The Etag for the resource (if relevant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Server's date time modified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(flatten, serialize_with = "serialize_response_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for BundleEntryResponse,
    serialize = serialize_response_extra,
    reserved = ["status", "location", "etag", "lastModified"],
);

impl<T> Bundle<T> {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: impl Into<String>) -> Self {
        Self {
            resource_type: BundleResourceType,
            id: None,
            bundle_type: bundle_type.into(),
            total: None,
            link: None,
            entry: None,
            extra: ExtensionMap::new(),
        }
    }

    /// Check if this is a search result bundle
    pub fn is_searchset(&self) -> bool {
        self.bundle_type == "searchset"
    }

    /// Check if this is a transaction bundle
    pub fn is_transaction(&self) -> bool {
        self.bundle_type == "transaction"
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry<T>] {
        self.entry.as_deref().unwrap_or(&[])
    }

    /// Resources carried by the entries, skipping entries without one
    pub fn resources(&self) -> impl Iterator<Item = &T> {
        self.entries().iter().filter_map(|e| e.resource.as_ref())
    }

    /// Add an entry to the bundle
    pub fn add_entry(&mut self, entry: BundleEntry<T>) {
        self.entry.get_or_insert_with(Vec::new).push(entry);
    }

    /// Wrap a resource in a new entry and add it
    pub fn add_resource(&mut self, full_url: Option<String>, resource: T) {
        let mut entry = BundleEntry::new(resource);
        entry.full_url = full_url;
        self.add_entry(entry);
    }

    /// Add a link to the bundle
    pub fn add_link(&mut self, relation: impl Into<String>, url: impl Into<String>) {
        self.link.get_or_insert_with(Vec::new).push(BundleLink {
            relation: relation.into(),
            url: url.into(),
            extra: ExtensionMap::new(),
        });
    }

    /// URL of the first link with the given relation (e.g. "next")
    pub fn link_url(&self, relation: &str) -> Option<&str> {
        self.link
            .iter()
            .flatten()
            .find(|l| l.relation == relation)
            .map(|l| l.url.as_str())
    }

    /// Convert every entry's resource, keeping all other bundle content
    pub fn map_resources<U, E, F>(self, mut f: F) -> std::result::Result<Bundle<U>, E>
    where
        F: FnMut(T) -> std::result::Result<U, E>,
    {
        let entry = match self.entry {
            Some(entries) => Some(
                entries
                    .into_iter()
                    .map(|e| e.map_resource(&mut f))
                    .collect::<std::result::Result<Vec<_>, E>>()?,
            ),
            None => None,
        };

        Ok(Bundle {
            resource_type: self.resource_type,
            id: self.id,
            bundle_type: self.bundle_type,
            total: self.total,
            link: self.link,
            entry,
            extra: self.extra,
        })
    }
}

impl<T: DeserializeOwned> Bundle<T> {
    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// Re-read a generic resource as a Bundle
    pub fn from_resource(resource: &Resource) -> Result<Self> {
        resource.expect_type(BundleResourceType::VALUE)?;
        resource.to_typed()
    }
}

impl<T: Serialize> Bundle<T> {
    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }
}

impl Bundle<Resource> {
    /// Re-type the entries into a specific resource shape
    pub fn into_typed<U: DeserializeOwned>(self) -> Result<Bundle<U>> {
        self.map_resources(|r| r.to_typed::<U>())
    }

    /// Resources of the given type
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources()
            .filter(move |r| r.resource_type == resource_type)
    }
}

impl<T> FhirResource for Bundle<T> {
    fn resource_type(&self) -> &str {
        BundleResourceType::VALUE
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl<T> BundleEntry<T> {
    pub fn new(resource: T) -> Self {
        Self {
            full_url: None,
            resource: Some(resource),
            search: None,
            request: None,
            response: None,
            extra: ExtensionMap::new(),
        }
    }

    /// Convert the entry's resource, keeping all other entry content
    pub fn map_resource<U, E, F>(self, f: F) -> std::result::Result<BundleEntry<U>, E>
    where
        F: FnOnce(T) -> std::result::Result<U, E>,
    {
        Ok(BundleEntry {
            full_url: self.full_url,
            resource: self.resource.map(f).transpose()?,
            search: self.search,
            request: self.request,
            response: self.response,
            extra: self.extra,
        })
    }
}

impl BundleEntrySearch {
    /// The score as a float, for ranking
    pub fn score_f64(&self) -> Option<f64> {
        self.score.as_ref().and_then(serde_json::Number::as_f64)
    }
}
