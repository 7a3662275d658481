//! Shared fixtures for the integration tests
//!
//! Builds listing and project pages shaped like the real site and mounts
//! them on a wiremock server.

#![allow(dead_code)]

use devpost_export::config::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Pagination control rendered at the bottom of a listing page
pub enum Pager {
    None,
    Next,
    Placeholder,
}

/// Creates a configuration pointing at the mock server
pub fn create_test_config(base_url: &str, workers: u32) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.workers = workers;
    config.user_agent.name = "TestHarvester".to_string();
    config
}

pub fn project_link(base_url: &str, slug: &str) -> String {
    format!("{}/software/{}", base_url, slug)
}

/// Renders a listing page containing the given project slugs
pub fn listing_page(
    base_url: &str,
    profile: &str,
    page: u32,
    slugs: &[String],
    pager: Pager,
) -> String {
    let mut html = String::from("<html><body><div class=\"gallery\">\n");
    for slug in slugs {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            project_link(base_url, slug),
            slug
        ));
        // Sub-resource link that must never be treated as a project
        html.push_str(&format!(
            "<a href=\"{}/software/built-with/{}\">tag</a>\n",
            base_url, slug
        ));
    }
    html.push_str("<a href=\"/hackathons\">Hackathons</a>\n</div>\n");

    match pager {
        Pager::None => {}
        Pager::Next => html.push_str(&format!(
            "<ul class=\"pagination\">\
             <li class=\"next next_page\"><a href=\"/{}?page={}\">Next</a></li>\
             </ul>\n",
            profile,
            page + 1
        )),
        Pager::Placeholder => html.push_str(
            "<ul class=\"pagination\">\
             <li class=\"next next_page disabled\"><a href=\"#\">Next</a></li>\
             </ul>\n",
        ),
    }

    html.push_str("</body></html>");
    html
}

/// Renders a minimal but complete project page
pub fn project_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <h1 id="app-title">{title}</h1>
        <p class="large">About {title}</p>
        <div id="app-details-left">
            <h2>What it does</h2>
            <p>{title} does things.</p>
            <div id="built-with"><span class="cp-tag">rust</span></div>
        </div>
        <a class="software-likes"><span class="side-count">4</span></a>
        <a id="software-comment-button"><span class="side-count">1</span></a>
        </body></html>"#
    )
}

pub async fn mount_listing(server: &MockServer, profile: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", profile)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_project(server: &MockServer, slug: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/software/{}", slug)))
        .respond_with(template)
        .mount(server)
        .await;
}

pub fn slugs(prefix: &str, range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("{}-{}", prefix, i)).collect()
}
