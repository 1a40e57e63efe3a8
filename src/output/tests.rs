//! Tests for output module

use super::*;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::PageSink;
use crate::types::Item;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn items(n: usize) -> Vec<Item> {
    (1..=n)
        .map(|i| Item::new(i.to_string(), format!("https://cdn.example.com/{i}.jpg")))
        .collect()
}

fn http() -> Arc<HttpClient> {
    Arc::new(HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap())
}

// ============================================================================
// Manifest Tests
// ============================================================================

#[test]
fn test_manifest_render() {
    let block = ManifestWriter::render(&items(2), ",");
    assert_eq!(
        block,
        "1,https://cdn.example.com/1.jpg\n2,https://cdn.example.com/2.jpg\n"
    );
    assert_eq!(ManifestWriter::render(&[], ","), "");
}

#[tokio::test]
async fn test_manifest_appends_pages_in_order() {
    let dir = tempdir().unwrap();
    let links = dir.path().join("links");

    let mut writer = ManifestWriter::create(&links, "album1", "|").await.unwrap();
    writer.on_page(1, &items(2)).await.unwrap();
    writer
        .on_page(2, &[Item::new("9", "https://cdn.example.com/9.jpg")])
        .await
        .unwrap();

    assert_eq!(writer.path(), links.join("album1.txt"));
    assert_eq!(writer.lines_written(), 3);

    let content = std::fs::read_to_string(links.join("album1.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1|https://cdn.example.com/1.jpg",
            "2|https://cdn.example.com/2.jpg",
            "9|https://cdn.example.com/9.jpg",
        ]
    );
}

#[tokio::test]
async fn test_manifest_is_truncated_on_create() {
    let dir = tempdir().unwrap();
    let manifest = ManifestWriter::manifest_path(dir.path(), "album1");
    std::fs::write(&manifest, "old,line\nother,line\n").unwrap();

    let mut writer = ManifestWriter::create(dir.path(), "album1", ",").await.unwrap();
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "");

    writer.on_page(1, &items(1)).await.unwrap();
    assert_eq!(
        std::fs::read_to_string(&manifest).unwrap(),
        "1,https://cdn.example.com/1.jpg\n"
    );
}

#[tokio::test]
async fn test_manifest_empty_page_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut writer = ManifestWriter::create(dir.path(), "a", ",").await.unwrap();
    writer.on_page(1, &[]).await.unwrap();
    assert_eq!(writer.lines_written(), 0);
    assert_eq!(std::fs::read_to_string(writer.path()).unwrap(), "");
}

#[tokio::test]
async fn test_manifest_create_fails_when_dir_is_a_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("links");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = ManifestWriter::create(&blocker, "a", ",").await.unwrap_err();
    assert!(matches!(err, crate::Error::Output { .. }));
}

// ============================================================================
// Download Tests
// ============================================================================

#[test]
fn test_path_for() {
    let downloader = ImageDownloader::new(http(), "/data/images", "album7", "jpg");
    assert_eq!(downloader.dir(), std::path::Path::new("/data/images/album7"));
    assert_eq!(
        downloader.path_for("123").unwrap(),
        std::path::Path::new("/data/images/album7/123.jpg")
    );
    assert!(downloader.path_for("../etc/passwd").is_err());
    assert!(downloader.path_for("..").is_err());
    assert!(downloader.path_for("").is_err());
}

#[tokio::test]
async fn test_download_page_saves_every_item() {
    let mock_server = MockServer::start().await;
    for i in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/img/{i}.jpg")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![i as u8; i * 10]))
            .mount(&mock_server)
            .await;
    }

    let dir = tempdir().unwrap();
    let page: Vec<Item> = (1..=3)
        .map(|i| Item::new(i.to_string(), format!("{}/img/{i}.jpg", mock_server.uri())))
        .collect();

    let mut downloader = ImageDownloader::new(http(), dir.path(), "album", "jpg");
    downloader.on_page(1, &page).await.unwrap();

    let report = downloader.into_report();
    assert!(report.all_saved());
    assert_eq!(report.saved.len(), 3);
    assert_eq!(report.bytes(), 60);
    for i in 1..=3 {
        let file = dir.path().join("album").join(format!("{i}.jpg"));
        assert_eq!(std::fs::read(file).unwrap().len(), i * 10);
    }
}

#[tokio::test]
async fn test_download_failures_are_isolated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/expired.jpg"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let uri = mock_server.uri();
    let page = vec![
        Item::new("1", format!("{uri}/img/ok.jpg")),
        Item::new("2", format!("{uri}/img/expired.jpg")),
        Item::new("3", format!("{uri}/img/ok.jpg")),
        Item::new("4", "http://127.0.0.1:9/unreachable.jpg"),
    ];

    let mut downloader = ImageDownloader::new(http(), dir.path(), "album", "jpg");
    downloader.on_page(1, &page).await.unwrap();

    let report = downloader.into_report();
    assert_eq!(report.attempted(), 4);
    assert_eq!(report.saved.len(), 2);
    let mut failed: Vec<&str> = report.failed.iter().map(|f| f.id.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["2", "4"]);

    let mut on_disk: Vec<String> = std::fs::read_dir(dir.path().join("album"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    on_disk.sort();
    assert_eq!(on_disk, vec!["1.jpg", "3.jpg"]);
}

#[tokio::test]
async fn test_download_page_waits_for_slowest_item() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/fast.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/slow.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![2u8])
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/slow-fail.jpg"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let uri = mock_server.uri();
    let page = vec![
        Item::new("fast", format!("{uri}/img/fast.jpg")),
        Item::new("slow", format!("{uri}/img/slow.jpg")),
        Item::new("slowfail", format!("{uri}/img/slow-fail.jpg")),
    ];

    let downloader = ImageDownloader::new(http(), dir.path(), "album", "png");
    let start = Instant::now();
    let outcomes = downloader.download_page(&page).await.unwrap();
    let elapsed = start.elapsed();

    // Settled together, not one after another
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(900));

    let ids: Vec<&str> = outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["fast", "slow", "slowfail"]);
    assert!(outcomes[0].is_ok() && outcomes[1].is_ok() && !outcomes[2].is_ok());
    assert!(dir.path().join("album/slow.png").exists());
    assert!(!dir.path().join("album/slowfail.png").exists());
}

#[tokio::test]
async fn test_unsafe_id_is_a_per_item_failure() {
    let dir = tempdir().unwrap();
    let downloader = ImageDownloader::new(http(), dir.path(), "album", "jpg");

    let outcomes = downloader
        .download_page(&[Item::new("../escape", "http://127.0.0.1:9/x.jpg")])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_ok());
    assert!(dir.path().join("album").is_dir());
}
