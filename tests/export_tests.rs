//! End-to-end export tests
//!
//! These tests use wiremock to serve a whole profile (listing pages and
//! project pages) and run the full export into a temporary directory.

mod common;

use common::{
    create_test_config, listing_page, mount_listing, mount_project, project_link, project_page,
    slugs, Pager,
};
use devpost_export::config::OutputFormat;
use devpost_export::crawler::Exporter;
use devpost_export::output::read_manifest;
use devpost_export::ExportError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

/// Serves "alice": 24 projects on page 1, 5 on page 2, two of them broken
async fn mount_alice(server: &MockServer) -> Vec<String> {
    let base = server.uri();
    let first = slugs("project", 0..24);
    let second = slugs("project", 24..29);

    mount_listing(
        server,
        "alice",
        1,
        listing_page(&base, "alice", 1, &first, Pager::Next),
    )
    .await;
    mount_listing(
        server,
        "alice",
        2,
        listing_page(&base, "alice", 2, &second, Pager::Placeholder),
    )
    .await;

    let all: Vec<String> = first.into_iter().chain(second).collect();
    for (i, slug) in all.iter().enumerate() {
        let template = match i {
            // Transport failure
            7 => ResponseTemplate::new(500),
            // Extraction failure: no title
            20 => ResponseTemplate::new(200).set_body_string("<html><body>gone</body></html>"),
            _ => ResponseTemplate::new(200)
                .set_body_string(project_page(&format!("Project {}", i))),
        };
        mount_project(server, slug, template).await;
    }

    all.iter().map(|slug| project_link(&base, slug)).collect()
}

#[tokio::test]
async fn test_full_export_with_partial_failures() {
    let server = MockServer::start().await;
    let links = mount_alice(&server).await;
    let output = TempDir::new().expect("Failed to create temp dir");

    let completed = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&completed);
    let exporter = Exporter::new(create_test_config(&server.uri(), 16))
        .expect("Failed to create exporter")
        .with_progress(move |snapshot| {
            seen.store(snapshot.completed, Ordering::SeqCst);
        });

    let summary = exporter
        .export("alice", 16, output.path(), OutputFormat::Json)
        .await
        .expect("Export failed");

    assert_eq!(summary.discovered, 29);
    assert_eq!(summary.succeeded, 27);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.written.len(), 27);
    assert!(summary.persist_failures.is_empty());
    assert_eq!(completed.load(Ordering::SeqCst), 29);

    let failed_ids: Vec<&str> = summary.failures.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(failed_ids, vec!["project-7", "project-20"]);
    assert!(summary.failures[0].reason.contains("500"));
    assert!(summary.failures[1].reason.contains("app-title"));

    // Manifest lists successful links only, in discovery order
    let manifest = read_manifest(&summary.manifest).expect("Failed to read manifest");
    assert_eq!(manifest.len(), 27);
    let expected: Vec<String> = links
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 7 && *i != 20)
        .map(|(_, link)| link.clone())
        .collect();
    assert_eq!(manifest, expected);
    let raw = std::fs::read_to_string(&summary.manifest).unwrap();
    assert_eq!(raw.lines().count(), 27);

    // One record file per success, none for the failures
    assert!(output.path().join("project-0.json").exists());
    assert!(output.path().join("project-28.json").exists());
    assert!(!output.path().join("project-7.json").exists());
    assert!(!output.path().join("project-20.json").exists());

    let record = std::fs::read_to_string(output.path().join("project-3.json")).unwrap();
    assert!(record.contains("\"likes\": 4"));
    assert!(record.contains("\"short-description\": \"About Project 3\""));
}

#[tokio::test]
async fn test_text_format_export() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    let output = TempDir::new().unwrap();

    let exporter = Exporter::new(create_test_config(&server.uri(), 4)).unwrap();
    let summary = exporter
        .export("alice", 4, output.path(), OutputFormat::Text)
        .await
        .expect("Export failed");

    assert_eq!(summary.written.len(), 27);
    let text = std::fs::read_to_string(output.path().join("project-1.txt")).unwrap();
    assert!(text.starts_with("Title: project-1\n"));
    assert!(text.contains("Built with: \n  - rust\n"));
}

#[tokio::test]
async fn test_export_is_idempotent() {
    let server = MockServer::start().await;
    mount_alice(&server).await;
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let exporter = Exporter::new(create_test_config(&server.uri(), 8)).unwrap();
    let a = exporter
        .export("alice", 8, first.path(), OutputFormat::Json)
        .await
        .unwrap();
    let b = exporter
        .export("alice", 3, second.path(), OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(a.written.len(), b.written.len());
    for (left, right) in a.written.iter().zip(&b.written) {
        assert_eq!(left.file_name(), right.file_name());
        assert_eq!(std::fs::read(left).unwrap(), std::fs::read(right).unwrap());
    }
    assert_eq!(
        std::fs::read(&a.manifest).unwrap(),
        std::fs::read(&b.manifest).unwrap()
    );
}

#[tokio::test]
async fn test_missing_profile_fails_fast() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let destination = output.path().join("ghost-projects");

    let exporter = Exporter::new(create_test_config(&server.uri(), 4)).unwrap();
    let result = exporter
        .export("ghost", 4, &destination, OutputFormat::Json)
        .await;

    assert!(matches!(result, Err(ExportError::ProfileNotFound { .. })));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_empty_profile_exports_nothing() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_listing(
        &server,
        "newbie",
        1,
        listing_page(&base, "newbie", 1, &[], Pager::None),
    )
    .await;
    let output = TempDir::new().unwrap();

    let exporter = Exporter::new(create_test_config(&base, 4)).unwrap();
    let summary = exporter
        .export("newbie", 4, output.path(), OutputFormat::Json)
        .await
        .expect("Export failed");

    assert_eq!(summary.discovered, 0);
    assert_eq!(summary.succeeded, 0);
    assert!(summary.is_complete());
    assert_eq!(std::fs::read_to_string(&summary.manifest).unwrap(), "");
}

#[tokio::test]
async fn test_duplicate_titles_do_not_overwrite() {
    let server = MockServer::start().await;
    let base = server.uri();
    let projects = slugs("twin", 0..2);
    mount_listing(
        &server,
        "ivy",
        1,
        listing_page(&base, "ivy", 1, &projects, Pager::None),
    )
    .await;
    for slug in &projects {
        mount_project(
            &server,
            slug,
            ResponseTemplate::new(200).set_body_string(project_page("Same Name")),
        )
        .await;
    }
    let output = TempDir::new().unwrap();

    let exporter = Exporter::new(create_test_config(&base, 2)).unwrap();
    let summary = exporter
        .export("ivy", 2, output.path(), OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(summary.written.len(), 2);
    assert!(output.path().join("same-name.json").exists());
    assert!(output.path().join("same-name-twin-1.json").exists());
}
