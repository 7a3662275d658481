//! Extraction rules for project detail pages

use crate::config::SiteConfig;
use crate::crawler::item_id;
use crate::extract::{slugify, Extractor, Hackathon, Project, TeamMember};
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extracts [`Project`] records from project pages
///
/// # Required Elements
///
/// | Selector | Used for |
/// |----------|----------|
/// | `#app-title` | title |
/// | `#app-details-left` | long description |
/// | `.software-likes` | like counter |
/// | `#software-comment-button` | comment counter |
///
/// Everything else is optional and falls back to an empty value.
#[derive(Debug, Clone, Default)]
pub struct ProjectPageExtractor {
    site: SiteConfig,
}

impl ProjectPageExtractor {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Project id: the part of the link after the detail prefix
    fn project_id(&self, link: &str) -> String {
        let prefix = self.site.detail_prefix();
        let id = link
            .strip_prefix(prefix.as_str())
            .map(|rest| rest.trim_end_matches('/').to_string())
            .filter(|rest| !rest.is_empty());
        id.unwrap_or_else(|| item_id(link))
    }
}

impl Extractor for ProjectPageExtractor {
    fn extract(&self, link: &str, document: &str) -> Result<Project, ExtractionError> {
        let html = Html::parse_document(document);
        let root = html.root_element();

        let title = slugify(&text_of(required(root, "#app-title")?));
        let short_description = first(root, ".large").map(text_of);

        let details = required(root, "#app-details-left")?;
        let long_description = long_description(details)?;

        let likes = counter(root, ".software-likes", "likes")?;
        let comments = counter(root, "#software-comment-button", "comments")?;

        let team_members: Vec<TeamMember> = all(root, ".software-team-member")
            .into_iter()
            .map(|member| team_member(member, link))
            .collect();

        // Hackathon and prizes share one container
        let submission = first(root, ".software-list-content");
        let hackathon = submission.and_then(|wrapper| first(wrapper, "p a")).map(|anchor| {
            Hackathon {
                name: text_of(anchor),
                link: anchor.value().attr("href").unwrap_or_default().to_string(),
            }
        });
        let awards: Vec<String> = submission
            .and_then(|wrapper| first(wrapper, "ul"))
            .map(|list| all(list, "li").into_iter().filter_map(award_name).collect())
            .unwrap_or_default();

        let built_with: Vec<String> = first(root, "#built-with")
            .map(|wrapper| all(wrapper, ".cp-tag").into_iter().map(text_of).collect())
            .unwrap_or_default();

        let relevant_links: Vec<String> = first(root, ".app-links")
            .map(|wrapper| {
                all(wrapper, "a[href]")
                    .into_iter()
                    .filter_map(|anchor| anchor.value().attr("href"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Project {
            title,
            id: self.project_id(link),
            link: link.to_string(),
            short_description,
            long_description,
            likes,
            comments,
            team_members,
            hackathon,
            awards,
            built_with,
            relevant_links,
        })
    }
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = scope.select(&selector).next();
    found
}

fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let selector = match Selector::parse(css) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let found: Vec<_> = scope.select(&selector).collect();
    found
}

fn required<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ExtractionError> {
    first(scope, css).ok_or_else(|| ExtractionError::MissingElement {
        selector: css.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Reads the `.side-count` inside a counter button; a missing tag means zero
fn counter(root: ElementRef<'_>, css: &str, field: &str) -> Result<u64, ExtractionError> {
    let button = required(root, css)?;
    let tag = match first(button, ".side-count") {
        Some(tag) => tag,
        None => return Ok(0),
    };

    let raw = text_of(tag);
    raw.replace(',', "")
        .parse::<u64>()
        .map_err(|_| ExtractionError::InvalidCount {
            field: field.to_string(),
            value: raw,
        })
}

/// Markdown of the details column without the media gallery
fn long_description(details: ElementRef<'_>) -> Result<String, ExtractionError> {
    let mut html = details.inner_html();
    if let Some(gallery) = first(details, "#gallery") {
        html = html.replacen(&gallery.html(), "", 1);
    }
    htmd::convert(&html).map_err(|e| ExtractionError::Markdown(e.to_string()))
}

fn team_member(member: ElementRef<'_>, page_link: &str) -> TeamMember {
    // The first profile link wraps the avatar, the second carries the name
    let profile_links = all(member, ".user-profile-link");
    let anchor = match profile_links.get(1).or_else(|| profile_links.first()) {
        Some(anchor) => *anchor,
        None => return TeamMember::unknown(),
    };

    let username = anchor
        .value()
        .attr("href")
        .and_then(|href| username_from_href(page_link, href))
        .unwrap_or_else(|| "unknown".to_string());

    TeamMember {
        name: text_of(anchor),
        username,
    }
}

fn username_from_href(page_link: &str, href: &str) -> Option<String> {
    let url = Url::parse(page_link).ok()?.join(href).ok()?;
    let username = url.path().trim_matches('/').to_string();
    if username.is_empty() {
        None
    } else {
        Some(username)
    }
}

/// Longest non-empty line of a prize entry, skipping the "Winner" label
fn award_name(item: ElementRef<'_>) -> Option<String> {
    let text: String = item.text().collect();
    let longest = text
        .lines()
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "Winner")
        .fold(None, |best: Option<&str>, part| match best {
            Some(best) if best.len() >= part.len() => Some(best),
            _ => Some(part),
        })
        .map(str::to_string);
    longest
}
