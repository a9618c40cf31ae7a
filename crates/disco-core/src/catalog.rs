//! Discovery catalog: fetching the remote index and applying the policy
//! overlay to produce the authoritative descriptor set for one run.
//!
//! The effective catalog is built exactly once per run by explicit
//! construction at run start and passed by reference to the dispatcher and
//! the reconciler. It is immutable thereafter; nothing re-fetches or
//! re-filters within a run.

use crate::policy::Policy;
use crate::{ApiDescriptor, ApiKey, Error, Fetcher, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Default location of the remote discovery index.
pub const DISCOVERY_INDEX_URL: &str = "https://www.googleapis.com/discovery/v1/apis";

/// Primary candidate URL for one API's raw description document.
///
/// The mirror is expected to hold the most current revision, so it is
/// tried ahead of the descriptor's own `discovery_rest_url`.
#[must_use]
pub fn mirror_url(index_url: &str, key: &ApiKey) -> String {
    format!(
        "{}/{}/{}/rest",
        index_url.trim_end_matches('/'),
        key.name,
        key.version
    )
}

#[derive(Debug, Deserialize)]
struct DirectoryList {
    #[serde(default)]
    items: Vec<ApiDescriptor>,
}

/// Fetches the raw discovery index. Performed at most once per run.
///
/// Any transport or decode failure is a fatal [`Error::CatalogFetch`]:
/// there is no local fallback catalog.
pub async fn fetch_directory(fetcher: &Fetcher, index_url: &str) -> Result<Vec<ApiDescriptor>> {
    let body = fetcher.fetch(index_url).await.map_err(|e| {
        Error::CatalogFetch(format!("failed to fetch discovery index from '{index_url}': {e}"))
    })?;
    let listing: DirectoryList = serde_json::from_str(&body)
        .map_err(|e| Error::CatalogFetch(format!("malformed discovery index: {e}")))?;
    info!("discovery index lists {} APIs", listing.items.len());
    Ok(listing.items)
}

/// Ordered descriptor sequence after the exclude-then-include overlay.
#[derive(Debug)]
pub struct EffectiveCatalog {
    entries: Vec<ApiDescriptor>,
}

impl EffectiveCatalog {
    /// Applies the policy overlay to the raw index, in this exact order:
    ///
    /// 1. drop every descriptor whose key is excluded;
    /// 2. append each include entry to the end of the sequence, unless a
    ///    descriptor with the same name and version is already present.
    ///
    /// Exclusion and inclusion are independent overlays evaluated in
    /// sequence: an include entry may reintroduce a key excluded in step
    /// one. Includes never overwrite attributes of an already-present
    /// descriptor; they are skipped outright on a name+version match.
    #[must_use]
    pub fn build(raw: Vec<ApiDescriptor>, policy: &Policy) -> Self {
        let mut entries: Vec<ApiDescriptor> = raw
            .into_iter()
            .filter(|descriptor| {
                if policy.excluded(&descriptor.key()) {
                    debug!("{descriptor} is excluded by policy");
                    return false;
                }
                true
            })
            .collect();

        for include in policy.includes() {
            let present = entries
                .iter()
                .any(|d| d.name == include.name && d.version == include.version);
            if present {
                debug!(
                    "include entry {}.{} already present in the catalog, skipping",
                    include.name, include.version
                );
                continue;
            }
            entries.push(include.to_descriptor());
        }

        Self { entries }
    }

    /// Descriptors in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[ApiDescriptor] {
        &self.entries
    }

    /// Looks up a descriptor by key.
    #[must_use]
    pub fn find(&self, key: &ApiKey) -> Option<&ApiDescriptor> {
        self.entries.iter().find(|d| &d.key() == key)
    }

    /// Canonical artifact ids of every cataloged descriptor.
    ///
    /// This is the keep-set the reconciler checks on-disk units against.
    #[must_use]
    pub fn artifact_ids(&self) -> HashSet<String> {
        self.entries.iter().map(ApiDescriptor::artifact_id).collect()
    }

    /// Number of descriptors in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use std::io::Write;

    fn descriptor(name: &str, version: &str, preferred: bool) -> ApiDescriptor {
        ApiDescriptor {
            name: name.into(),
            version: version.into(),
            description: format!("{name} {version}"),
            preferred,
            discovery_rest_url: format!("https://example.test/{name}/{version}/rest"),
        }
    }

    fn policy_from(contents: &str) -> Policy {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Policy::load(file.path()).unwrap()
    }

    #[test]
    fn ids_are_pairwise_distinct_and_derived() {
        let raw = vec![
            descriptor("books", "v1", true),
            descriptor("books", "v2", false),
            descriptor("blogger", "v1", true),
        ];
        let catalog = EffectiveCatalog::build(raw, &Policy::empty());

        let ids: Vec<String> = catalog.entries().iter().map(ApiDescriptor::id).collect();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        for entry in catalog.entries() {
            assert_eq!(entry.id(), format!("{}.{}", entry.name, entry.version));
        }
    }

    #[test]
    fn exclude_drops_descriptors() {
        let raw = vec![descriptor("books", "v1", true), descriptor("blogger", "v1", true)];
        let policy = policy_from(r#"exclude = ["books.v1"]"#);
        let catalog = EffectiveCatalog::build(raw, &policy);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.find(&ApiKey::new("books", "v1")).is_none());
        assert!(catalog.find(&ApiKey::new("blogger", "v1")).is_some());
    }

    #[test]
    fn include_reintroduces_an_excluded_id_exactly_once() {
        let raw = vec![descriptor("books", "v1", true)];
        let policy = policy_from(
            r#"
exclude = ["books.v1"]

[[include]]
name = "books"
version = "v1"
discovery_rest_url = "https://mirror.example/books/v1/rest"
"#,
        );
        let catalog = EffectiveCatalog::build(raw, &policy);

        let matching: Vec<&ApiDescriptor> = catalog
            .entries()
            .iter()
            .filter(|d| d.key() == ApiKey::new("books", "v1"))
            .collect();
        assert_eq!(matching.len(), 1);
        // The reintroduced entry carries the include's attributes.
        assert_eq!(
            matching[0].discovery_rest_url,
            "https://mirror.example/books/v1/rest"
        );
    }

    #[test]
    fn include_never_overwrites_an_existing_descriptor() {
        let raw = vec![descriptor("books", "v1", true)];
        let policy = policy_from(
            r#"
[[include]]
name = "books"
version = "v1"
description = "local override"
"#,
        );
        let catalog = EffectiveCatalog::build(raw, &policy);

        assert_eq!(catalog.len(), 1);
        let entry = catalog.find(&ApiKey::new("books", "v1")).unwrap();
        assert_eq!(entry.description, "books v1");
    }

    #[test]
    fn includes_append_at_the_end_in_order() {
        let raw = vec![descriptor("books", "v1", true)];
        let policy = policy_from(
            r#"
[[include]]
name = "alpha"
version = "v1"

[[include]]
name = "beta"
version = "v1"
"#,
        );
        let catalog = EffectiveCatalog::build(raw, &policy);

        let ids: Vec<String> = catalog.entries().iter().map(ApiDescriptor::id).collect();
        assert_eq!(ids, vec!["books.v1", "alpha.v1", "beta.v1"]);
    }

    #[test]
    fn duplicate_include_entries_collapse() {
        let policy = policy_from(
            r#"
[[include]]
name = "alpha"
version = "v1"

[[include]]
name = "alpha"
version = "v1"
"#,
        );
        let catalog = EffectiveCatalog::build(Vec::new(), &policy);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn artifact_ids_cover_every_entry() {
        let raw = vec![descriptor("books", "v1", true), descriptor("AdExchange", "v1.1", false)];
        let catalog = EffectiveCatalog::build(raw, &Policy::empty());
        let ids = catalog.artifact_ids();
        assert!(ids.contains("books_v1"));
        assert!(ids.contains("ad_exchange_v1_1"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn mirror_url_is_templated_by_name_and_version() {
        let key = ApiKey::new("books", "v1");
        assert_eq!(
            mirror_url("https://www.googleapis.com/discovery/v1/apis", &key),
            "https://www.googleapis.com/discovery/v1/apis/books/v1/rest"
        );
        // Trailing slash on the base collapses.
        assert_eq!(
            mirror_url("https://mirror.example/apis/", &key),
            "https://mirror.example/apis/books/v1/rest"
        );
    }

    #[tokio::test]
    async fn fetch_directory_decodes_the_index() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let body = r#"{
            "kind": "discovery#directoryList",
            "items": [
                {"name": "books", "version": "v1", "preferred": true,
                 "description": "Books API",
                 "discoveryRestUrl": "https://example.test/books/v1/rest"}
            ]
        }"#;
        Mock::given(method("GET"))
            .and(path("/apis"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let raw = fetch_directory(&fetcher, &format!("{}/apis", server.uri()))
            .await
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].id(), "books.v1");
        assert!(raw[0].preferred);
    }

    #[tokio::test]
    async fn fetch_directory_failure_is_fatal() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = fetch_directory(&fetcher, &format!("{}/apis", server.uri()))
            .await
            .expect_err("index outage must be fatal");
        assert!(matches!(err, Error::CatalogFetch(_)));
    }

    #[tokio::test]
    async fn fetch_directory_rejects_malformed_bodies() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = fetch_directory(&fetcher, &format!("{}/apis", server.uri()))
            .await
            .expect_err("malformed index must be fatal");
        assert!(matches!(err, Error::CatalogFetch(_)));
    }
}
