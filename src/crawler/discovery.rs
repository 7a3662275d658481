//! Pagination-driven link discovery
//!
//! Walks a profile's listing pages starting at page 1, collecting every
//! project link in page-then-position order. Pagination stops when a page
//! has no "next page" control, or when that control points at a placeholder
//! (`#`) instead of a real page.
//!
//! A transport failure on any listing page is fatal: a partial link list
//! would silently under-report the profile.

use crate::config::SiteConfig;
use crate::crawler::fetcher::HttpFetcher;
use crate::{ExportError, Link, TransportError};
use scraper::{Html, Selector};
use url::Url;

/// Hard stop for runaway pagination
pub const MAX_LISTING_PAGES: u32 = 1000;

/// State of a listing page's "next page" control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// No pagination control at all (single-page profile)
    Absent,

    /// Control present but pointing nowhere (last page reached)
    Placeholder,

    /// Control pointing at a further page
    Advancing(String),
}

/// Links and pagination state extracted from one listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub links: Vec<Link>,
    pub next: NextPage,
}

/// Parses a listing page
///
/// # Link Rules
///
/// - `<a href>` values are resolved against `page_url`
/// - a link qualifies when it starts with the site's detail prefix and has
///   something after it
/// - links containing the excluded marker (e.g. `built-with`) are dropped
///
/// # Returns
///
/// * `Ok(ListingPage)` - Links in document order plus the pagination state
/// * `Err(String)` - The pagination control exists but has no usable anchor
pub fn parse_listing_page(
    html: &str,
    page_url: &Url,
    site: &SiteConfig,
) -> Result<ListingPage, String> {
    let document = Html::parse_document(html);
    let prefix = site.detail_prefix();

    let anchor_selector = selector("a[href]")?;
    let links = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .map(|url| url.to_string())
        .filter(|link| {
            link.strip_prefix(prefix.as_str())
                .map_or(false, |rest| !rest.is_empty())
        })
        .filter(|link| !link.contains(site.excluded_marker.as_str()))
        .collect();

    let next = parse_next_page(&document, page_url)?;

    Ok(ListingPage { links, next })
}

fn parse_next_page(document: &Html, page_url: &Url) -> Result<NextPage, String> {
    let next_selector = selector(".next_page")?;
    let control = match document.select(&next_selector).next() {
        Some(control) => control,
        None => return Ok(NextPage::Absent),
    };

    // The control may itself be the anchor or wrap one
    let href = if control.value().name() == "a" {
        control.value().attr("href")
    } else {
        let anchor_selector = selector("a")?;
        control
            .select(&anchor_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
    };

    let href = match href {
        Some(href) => href.trim(),
        None => return Err("next-page control has no link".to_string()),
    };

    if href.is_empty() || href.starts_with('#') {
        return Ok(NextPage::Placeholder);
    }

    page_url
        .join(href)
        .map(|url| NextPage::Advancing(url.to_string()))
        .map_err(|e| format!("next-page link '{}' is invalid: {}", href, e))
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

/// Enumerates every project link of a profile
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    fetcher: HttpFetcher,
    site: SiteConfig,
}

impl LinkDiscoverer {
    pub fn new(fetcher: HttpFetcher, site: SiteConfig) -> Self {
        Self { fetcher, site }
    }

    /// Checks that the profile exists before any crawling starts
    ///
    /// # Returns
    ///
    /// * `Ok(())` - First listing page answered successfully
    /// * `Err(ExportError::ProfileNotFound)` - Server answered with a client error
    /// * `Err(ExportError::Discovery)` - Server error or network failure
    pub async fn probe_profile(&self, profile: &str) -> Result<(), ExportError> {
        let url = self.site.profile_page_url(profile, 1)?;
        match self.fetcher.fetch(url.as_str()).await {
            Ok(_) => Ok(()),
            Err(TransportError::NotFound { .. }) | Err(TransportError::Status { .. }) => {
                Err(ExportError::ProfileNotFound {
                    profile: profile.to_string(),
                })
            }
            Err(source) => Err(ExportError::Discovery { source }),
        }
    }

    /// Walks all listing pages of `profile` and returns the project links
    ///
    /// A profile without projects yields an empty list, not an error.
    pub async fn discover(&self, profile: &str) -> Result<Vec<Link>, ExportError> {
        let mut links = Vec::new();
        let mut page_number = 1;

        loop {
            let page_url = self.site.profile_page_url(profile, page_number)?;
            let body = self
                .fetcher
                .fetch(page_url.as_str())
                .await
                .map_err(|source| ExportError::Discovery { source })?;

            let listing = parse_listing_page(&body, &page_url, &self.site)
                .map_err(|message| ExportError::SiteLayout {
                    url: page_url.to_string(),
                    message,
                })?;

            tracing::info!(
                "Scraped page {} of {}'s profile: found {} projects",
                page_number,
                profile,
                listing.links.len()
            );
            links.extend(listing.links);

            match listing.next {
                NextPage::Absent | NextPage::Placeholder => break,
                NextPage::Advancing(target) => {
                    tracing::debug!("Next page control points at {}", target);
                }
            }

            if page_number >= MAX_LISTING_PAGES {
                return Err(ExportError::SiteLayout {
                    url: page_url.to_string(),
                    message: format!(
                        "pagination did not terminate after {} pages",
                        MAX_LISTING_PAGES
                    ),
                });
            }
            page_number += 1;
        }

        tracing::info!("Found a total of {} projects", links.len());
        Ok(links)
    }
}
