//! Tests for RepositoryScanner

use crate::core::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::registry::error::RegistryError;
use crate::registry::repository::{extract_location_and_repository, RepositoryScanner, MAX_CANDIDATES};
use crate::registry::tests::helpers::*;
use crate::registry::types::DockerImage;
use std::sync::Arc;

fn scanner_for(client: MockRegistryClient) -> (Arc<MockRegistryClient>, RepositoryScanner) {
    let client = Arc::new(client);
    let scanner = RepositoryScanner::new(client.clone());
    (client, scanner)
}

#[test]
fn test_extract_location_and_repository() {
    assert_eq!(
        extract_location_and_repository("projects/p/locations/asia-northeast1/repositories/apps"),
        ("asia-northeast1", "apps")
    );
    assert_eq!(extract_location_and_repository("projects/p/locations/x"), ("", ""));
    assert_eq!(extract_location_and_repository(""), ("", ""));
}

#[tokio::test]
async fn test_latest_tag_selected_per_image() {
    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page(
        "apps",
        vec![
            image("apps", "web", "web-new", &["v2"], 0),
            image("apps", "web", "web-old", &["latest", "v1"], 10),
            image("apps", "api", "api-new", &["v9"], 1),
            image("apps", "api", "api-old", &["v8"], 5),
        ],
    ));

    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(targets.len(), 2);
    // Ordered by image name
    assert_eq!(targets[0].artifact.image_name, "api");
    assert_eq!(targets[0].artifact.digest.as_deref(), Some(digest("api-new").as_str()));
    assert_eq!(targets[1].artifact.image_name, "web");
    assert_eq!(targets[1].artifact.digest.as_deref(), Some(digest("web-old").as_str()));

    for target in &targets {
        assert_eq!(target.location, LOCATION);
        assert_eq!(target.repository, "apps");
        assert_eq!(target.artifact.project_id, PROJECT);
        assert!(target.uri.ends_with(target.artifact.digest.as_deref().unwrap()));
    }
}

#[tokio::test]
async fn test_candidate_window_caps_each_image() {
    // Newest first; the `latest` version sits just beyond the window
    let mut images: Vec<DockerImage> = (0..MAX_CANDIDATES)
        .map(|i| image("apps", "web", &format!("web-{}", i), &[], i as i64))
        .collect();
    images.push(image("apps", "web", "web-latest", &["latest"], 100));
    images.push(image("apps", "worker", "worker-1", &[], 0));

    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page("apps", images));
    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].artifact.image_name, "web");
    assert_eq!(targets[0].artifact.digest.as_deref(), Some(digest("web-0").as_str()));
    assert_eq!(targets[1].artifact.image_name, "worker");
}

#[tokio::test]
async fn test_custom_candidate_window() {
    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page(
        "apps",
        vec![
            image("apps", "web", "web-a", &[], 3),
            image("apps", "web", "web-b", &["latest"], 1),
        ],
    ));
    let scanner = scanner.with_max_candidates(1);

    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(targets[0].artifact.digest.as_deref(), Some(digest("web-a").as_str()));
}

#[tokio::test]
async fn test_images_grouped_across_pages() {
    let (client, scanner) = scanner_for(
        MockRegistryClient::new()
            .with_image_page("apps", vec![image("apps", "web", "web-1", &[], 2)])
            .with_image_page("apps", vec![image("apps", "web", "web-2", &[], 0)]),
    );

    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(client.image_calls(), 2);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].artifact.digest.as_deref(), Some(digest("web-2").as_str()));
}

#[tokio::test]
async fn test_nested_image_paths() {
    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page(
        "apps",
        vec![image("apps", "team/service/worker", "nested", &["latest"], 0)],
    ));

    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(targets[0].artifact.image_name, "team/service/worker");
}

#[tokio::test]
async fn test_image_without_digest_is_skipped() {
    let mut tag_only = image("apps", "web", "unused", &["v1"], 0);
    tag_only.uri = format!("{}-docker.pkg.dev/{}/apps/web:v1", LOCATION, PROJECT);

    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page(
        "apps",
        vec![tag_only, image("apps", "api", "api-1", &[], 0)],
    ));

    let targets = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].artifact.image_name, "api");
}

#[tokio::test]
async fn test_unparsable_uri_fails_repository() {
    let mut broken = image("apps", "web", "web-1", &[], 0);
    broken.uri = "docker.io/library/nginx:latest".to_string();

    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_page("apps", vec![broken]));

    let err = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap_err();

    match err {
        RegistryError::ListingFailed { resource, source } => {
            assert_eq!(resource, repository_name("apps"));
            assert!(source.to_string().contains("invalid GAR URI format"));
        }
        other => panic!("expected ListingFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_listing_error_fails_repository() {
    let (_, scanner) = scanner_for(MockRegistryClient::new().with_image_error("apps", "permission denied"));

    let err = scanner
        .scan(&repository_name("apps"), &ShutdownSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::ListingFailed { .. }));
    assert!(err.to_string().contains("permission denied"));
}

#[tokio::test]
async fn test_empty_repository_yields_nothing() {
    let (_, scanner) = scanner_for(MockRegistryClient::new());

    let targets = scanner
        .scan(&repository_name("empty"), &ShutdownSignal::never())
        .await
        .unwrap();

    assert!(targets.is_empty());
}

#[tokio::test]
async fn test_triggered_shutdown_cancels_scan() {
    let coordinator = ShutdownCoordinator::new();
    coordinator.trigger_shutdown();

    let (_, scanner) = scanner_for(
        MockRegistryClient::new().with_image_page("apps", vec![image("apps", "web", "web-1", &[], 0)]),
    );

    let err = scanner
        .scan(&repository_name("apps"), &coordinator.signal())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Cancelled { .. }));
}
