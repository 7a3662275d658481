//! Record extraction from fetched project pages
//!
//! [`Extractor`] is the seam between the crawl pipeline and a particular
//! site layout. The pipeline only needs `extract(link, document)`; the
//! project-page rules live in [`ProjectPageExtractor`].

mod project;
mod slug;

pub use project::ProjectPageExtractor;
pub use slug::slugify;

use crate::ExtractionError;
use serde::Serialize;

/// Turns a raw document into a [`Project`]
///
/// Implementations are shared by every worker, so they must be thread-safe.
pub trait Extractor: Send + Sync {
    /// Extracts a record from the page fetched from `link`
    fn extract(&self, link: &str, document: &str) -> Result<Project, ExtractionError>;
}

/// One exported project
///
/// Field order is the serialization order of the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Project {
    /// Slugified project title
    pub title: String,
    pub id: String,
    pub link: String,
    pub short_description: Option<String>,

    /// Markdown rendering of the project story
    pub long_description: String,
    pub likes: u64,
    pub comments: u64,
    pub team_members: Vec<TeamMember>,

    /// Hidden from logged-out visitors on some projects
    pub hackathon: Option<Hackathon>,
    pub awards: Vec<String>,
    pub built_with: Vec<String>,
    pub relevant_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub name: String,
    pub username: String,
}

impl TeamMember {
    /// Placeholder for a member without a public profile
    pub fn unknown() -> Self {
        Self {
            name: "Unknown User".to_string(),
            username: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hackathon {
    pub name: String,
    pub link: String,
}
