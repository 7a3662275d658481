use serde::Deserialize;
use std::fmt;
use url::{ParseError, Url};

/// Main configuration structure for Devpost-Export
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site layout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the site, profiles live at `<base-url>/<profile>`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path segment under which project pages live
    #[serde(rename = "detail-path")]
    pub detail_path: String,

    /// Links containing this substring are sub-resources, not projects
    #[serde(rename = "excluded-marker")]
    pub excluded_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://devpost.com".to_string(),
            detail_path: "software".to_string(),
            excluded_marker: "built-with".to_string(),
        }
    }
}

impl SiteConfig {
    /// URL of one listing page of a profile
    ///
    /// The profile becomes a single escaped path segment, so characters such
    /// as `#`, `?` or `/` cannot change the page query.
    pub fn profile_page_url(&self, profile: &str, page: u32) -> Result<Url, ParseError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithoutBase)?
            .pop_if_empty()
            .push(profile);
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Prefix every project link starts with, including the trailing slash
    pub fn detail_prefix(&self) -> String {
        format!(
            "{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.detail_path.trim_matches('/')
        )
    }
}

/// Worker pool and transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch+extract workers
    pub workers: u32,

    /// Per-request timeout; the transport default applies when unset
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    /// Refuse plain-HTTP requests
    #[serde(rename = "https-only")]
    pub https_only: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 16,
            request_timeout_secs: None,
            https_only: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,

    /// URL with information about the tool, appended to the user agent
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "devpost-export".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// File name of the manifest listing every exported project link
    #[serde(rename = "manifest-name")]
    pub manifest_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            manifest_name: "_projects.txt".to_string(),
        }
    }
}

/// Serialization format for persisted records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}
