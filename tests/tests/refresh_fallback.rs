//! Refresh failure paths: snapshot fallback and the no-data-at-all case.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use integration_tests::fixtures;

use innews_client::{extract, InnewsClient, UpstreamConfig};
use snapshot_store::{SnapshotConfig, SnapshotStore};
use stats_core::{transform_daily, transform_total, Error, Snapshot};
use worker::{Refresher, RefreshSource, StatsState};

fn store_in(dir: &tempfile::TempDir) -> SnapshotStore {
    SnapshotStore::new(SnapshotConfig {
        data_dir: dir.path().to_path_buf(),
    })
}

fn client_for(base_url: &str) -> InnewsClient {
    InnewsClient::new(UpstreamConfig {
        base_url: base_url.to_string(),
        timeout_secs: 2,
    })
    .unwrap()
}

/// Persist a derived snapshot built from the fixtures, and return it.
fn seed_snapshot(store: &SnapshotStore) -> Snapshot {
    let bundle = extract(&fixtures::sample_page()).unwrap();
    let snapshot = Snapshot {
        daily: transform_daily(&bundle.daily),
        three_day: bundle.three_day,
        weekly: bundle.weekly,
        total: transform_total(&bundle.total).unwrap(),
    };

    store.write_daily(&snapshot.daily).unwrap();
    store.write_three_day(&snapshot.three_day).unwrap();
    store.write_weekly(&snapshot.weekly).unwrap();
    store.write_total(&snapshot.total).unwrap();

    snapshot
}

/// Minimal one-shot HTTP server answering every request with the given
/// head, for driving the non-2xx path without a real upstream.
async fn spawn_status_server(head: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = sock.read(&mut buf).await;
            let _ = sock.write_all(head.as_bytes()).await;
        }
    });

    format!("http://{addr}/")
}

#[tokio::test]
async fn test_connection_failure_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let seeded = seed_snapshot(&store);

    // Port 9 (discard) is not listening; the request fails at connect.
    let state = Arc::new(StatsState::new());
    let refresher = Refresher::new(client_for("http://127.0.0.1:9/"), store, state.clone(), false);

    let source = refresher.refresh(false).await.unwrap();
    assert_eq!(source, RefreshSource::Snapshot);

    let published = state.load();
    assert_eq!(published.daily.len(), seeded.daily.len());
    assert_eq!(
        published.latest_daily().unwrap().calculated_cases_cumsum,
        seeded.latest_daily().unwrap().calculated_cases_cumsum
    );
    assert_eq!(published.total, seeded.total);
}

#[tokio::test]
async fn test_non_2xx_status_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let seeded = seed_snapshot(&store);

    let url = spawn_status_server(
        "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;

    let state = Arc::new(StatsState::new());
    let refresher = Refresher::new(client_for(&url), store, state.clone(), false);

    let source = refresher.refresh(false).await.unwrap();
    assert_eq!(source, RefreshSource::Snapshot);
    assert_eq!(state.load().total, seeded.total);
}

#[tokio::test]
async fn test_page_without_data_script_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    seed_snapshot(&store);

    let url = spawn_status_server(
        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: 28\r\nconnection: close\r\n\r\n<html><body>hi</body></html>",
    )
    .await;

    let state = Arc::new(StatsState::new());
    let refresher = Refresher::new(client_for(&url), store, state.clone(), false);

    let source = refresher.refresh(false).await.unwrap();
    assert_eq!(source, RefreshSource::Snapshot);
    assert!(!state.load().is_empty());
}

#[tokio::test]
async fn test_missing_snapshot_after_fetch_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let state = Arc::new(StatsState::new());
    let refresher = Refresher::new(client_for("http://127.0.0.1:9/"), store, state.clone(), false);

    let err = refresher.refresh(false).await.unwrap_err();
    assert!(matches!(err, Error::Snapshot(_)));

    // The previous (empty) state stands; nothing partial was published.
    assert!(state.load().is_empty());
}
