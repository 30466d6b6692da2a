//! Illustrative image lookup for flower records.
//!
//! Defines the [`ImageSearch`] trait (one search request against a remote
//! encyclopedia) and its implementations:
//! - **[`WikipediaSearch`]**: MediaWiki `generator=search` + `pageimages` over blocking HTTP.
//! - **[`DisabledSearch`]**: fails every request; used when `images.provider = "disabled"`.
//!
//! [`ImageResolver`] sits on top and turns a flower name into an
//! [`ImageLookup`]. Failures never escape as errors, they are values.
//!
//! # Query Strategy
//!
//! 1. Search for `"<name> <qualifier>"` to bias results toward plants.
//! 2. If that returns no pages, search once more for the bare name.
//! 3. Take the top page's original image, if it has one.
//!
//! Every outcome, failures included, is cached per name. Failures may use
//! a shorter TTL (`images.failure_ttl_secs`).

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::ImagesConfig;

/// Image URL on success, or why there is none.
pub type ImageLookup = std::result::Result<String, ImageFailure>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageFailure {
    #[error("flower name is empty")]
    EmptyName,
    #[error("search returned no results")]
    NoSearchResults,
    #[error("top result has no image")]
    NoImageAvailable,
    #[error("remote error: {0}")]
    RemoteError(String),
    #[error("unknown error")]
    Unknown,
}

/// One page from a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub title: String,
    /// Rank within the search results; lower is better.
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub original: Option<PageImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageImage {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    pages: HashMap<String, SearchPage>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

/// A remote service that answers one text query with ranked pages.
///
/// Implementations report transport problems (timeouts, bad status,
/// malformed bodies) as `Err`; "nothing found" is an empty `Vec`.
pub trait ImageSearch: Send + Sync {
    /// Short identifier used in logs (e.g. `"wikipedia"`).
    fn name(&self) -> &str;

    /// Attribution shown next to a found image.
    fn source_label(&self) -> &str;

    /// Runs a single search, returning pages best first.
    fn search(&self, query: &str) -> Result<Vec<SearchPage>>;
}

/// Parse a MediaWiki `action=query` response body.
///
/// A missing `query.pages` object means no results. An `error` object is
/// reported as an `Err`.
pub fn parse_search_response(body: &str) -> Result<Vec<SearchPage>> {
    let response: ApiResponse =
        serde_json::from_str(body).context("malformed search response")?;

    if let Some(err) = response.error {
        bail!("API error {}: {}", err.code, err.info);
    }

    let mut pages: Vec<SearchPage> = response
        .query
        .map(|q| q.pages.into_values().collect())
        .unwrap_or_default();
    pages.sort_by_key(|p| p.index.unwrap_or(u32::MAX));
    Ok(pages)
}

// ============ Wikipedia ============

/// Searches a MediaWiki installation for a page and its original image.
pub struct WikipediaSearch {
    client: reqwest::blocking::Client,
    endpoint: String,
    label: String,
}

impl WikipediaSearch {
    pub fn new(config: &ImagesConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            label: endpoint_label(&config.endpoint),
        })
    }
}

/// "Wikipedia" for any `*.wikipedia.org` endpoint, otherwise the host.
fn endpoint_label(endpoint: &str) -> String {
    let host = match reqwest::Url::parse(endpoint) {
        Ok(url) => url.host_str().map(str::to_string),
        Err(_) => None,
    };
    match host {
        Some(host) if host == "wikipedia.org" || host.ends_with(".wikipedia.org") => {
            "Wikipedia".to_string()
        }
        Some(host) => host,
        None => endpoint.to_string(),
    }
}

impl ImageSearch for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn source_label(&self) -> &str {
        &self.label
    }

    fn search(&self, query: &str) -> Result<Vec<SearchPage>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", "1"),
                ("prop", "pageimages"),
                ("piprop", "original"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {}", status);
        }

        let body = response.text()?;
        parse_search_response(&body)
    }
}

// ============ Disabled ============

pub struct DisabledSearch;

impl ImageSearch for DisabledSearch {
    fn name(&self) -> &str {
        "disabled"
    }

    fn source_label(&self) -> &str {
        "none"
    }

    fn search(&self, _query: &str) -> Result<Vec<SearchPage>> {
        bail!("image search is disabled")
    }
}

/// Create the [`ImageSearch`] named by `images.provider`.
pub fn create_search(config: &ImagesConfig) -> Result<Box<dyn ImageSearch>> {
    match config.provider.as_str() {
        "wikipedia" => Ok(Box::new(WikipediaSearch::new(config)?)),
        "disabled" => Ok(Box::new(DisabledSearch)),
        other => bail!("Unknown image provider: {}", other),
    }
}

// ============ Resolver ============

pub struct ImageResolver {
    search: Box<dyn ImageSearch>,
    qualifier: String,
    cache: TtlCache<String, ImageLookup>,
    ttl: Duration,
    failure_ttl: Duration,
}

impl ImageResolver {
    pub fn new(search: Box<dyn ImageSearch>, config: &ImagesConfig) -> Self {
        Self::with_ttls(
            search,
            &config.qualifier,
            Duration::from_secs(config.ttl_secs),
            Duration::from_secs(config.failure_ttl_secs()),
        )
    }

    pub fn with_ttls(
        search: Box<dyn ImageSearch>,
        qualifier: &str,
        ttl: Duration,
        failure_ttl: Duration,
    ) -> Self {
        Self {
            search,
            qualifier: qualifier.trim().to_string(),
            cache: TtlCache::new(),
            ttl,
            failure_ttl,
        }
    }

    pub fn from_config(config: &ImagesConfig) -> Result<Self> {
        Ok(Self::new(create_search(config)?, config))
    }

    /// Best-effort image URL for `name`.
    ///
    /// Blocks on at most two remote searches; cached results return
    /// without any.
    pub fn resolve(&self, name: &str) -> ImageLookup {
        if name.is_empty() {
            return Err(ImageFailure::EmptyName);
        }

        if let Some(cached) = self.cache.get(name) {
            debug!("image cache hit for '{}'", name);
            return cached;
        }

        let result = self.lookup(name);
        let ttl = if result.is_ok() {
            self.ttl
        } else {
            self.failure_ttl
        };
        self.cache.insert(name.to_string(), result.clone(), ttl);
        result
    }

    /// Attribution for URLs this resolver returns.
    pub fn source_label(&self) -> &str {
        self.search.source_label()
    }

    fn lookup(&self, name: &str) -> ImageLookup {
        let qualified = self.qualified_query(name);
        let mut pages = self.run_search(&qualified)?;
        if pages.is_empty() && qualified != name {
            debug!("no pages for '{}', retrying with '{}'", qualified, name);
            pages = self.run_search(name)?;
        }

        let top = pages
            .into_iter()
            .next()
            .ok_or(ImageFailure::NoSearchResults)?;

        match top.original {
            None => Err(ImageFailure::NoImageAvailable),
            Some(PageImage {
                source: Some(url), ..
            }) if !url.is_empty() => Ok(url),
            Some(_) => {
                warn!("page '{}' has an image without a source", top.title);
                Err(ImageFailure::Unknown)
            }
        }
    }

    fn run_search(&self, query: &str) -> PageLookup {
        self.search.search(query).map_err(|e| {
            warn!("{} search for '{}' failed: {:#}", self.search.name(), query, e);
            ImageFailure::RemoteError(format!("{:#}", e))
        })
    }

    fn qualified_query(&self, name: &str) -> String {
        if self.qualifier.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, self.qualifier)
        }
    }
}

type PageLookup = std::result::Result<Vec<SearchPage>, ImageFailure>;
