//! Historic log assembly tests

use std::collections::HashMap;
use std::time::Duration;

use app_action::deploy::log_bundle::{LogFetcher, Options};
use apps_api::AppLogType;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::fake::{serve, FakeApps, FakeLogs, FakeState};

async fn segment_server() -> String {
    let router = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                "A"
            }),
        )
        .route("/a", get(|| async { "A" }))
        .route("/b", get(|| async { "B" }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    serve(router).await
}

fn fetcher() -> LogFetcher {
    LogFetcher::new(&Options::default()).unwrap()
}

fn apps_with(log_type: AppLogType, logs: FakeLogs) -> FakeApps {
    FakeApps::new(FakeState {
        logs: HashMap::from([(log_type, logs)]),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_segments_concatenate_in_list_order() {
    let base = segment_server().await;
    let apps = apps_with(
        AppLogType::Build,
        FakeLogs::Urls(vec![format!("{base}/a"), format!("{base}/b")]),
    );

    let logs = fetcher()
        .fetch(&apps, "app-1", "dep-1", AppLogType::Build)
        .await
        .unwrap();
    assert_eq!(logs, b"AB");
}

#[tokio::test]
async fn test_order_does_not_depend_on_completion_order() {
    let base = segment_server().await;
    let urls = vec![format!("{base}/b"), format!("{base}/slow"), format!("{base}/b")];

    let logs = fetcher().fetch_historic(&urls).await.unwrap();
    assert_eq!(logs, b"BAB");
}

#[tokio::test]
async fn test_not_reached_yields_empty_bundle() {
    let apps = apps_with(AppLogType::Deploy, FakeLogs::Status(StatusCode::BAD_REQUEST));

    let logs = fetcher()
        .fetch(&apps, "app-1", "dep-1", AppLogType::Deploy)
        .await
        .unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_other_api_errors_propagate() {
    let apps = apps_with(
        AppLogType::Build,
        FakeLogs::Status(StatusCode::INTERNAL_SERVER_ERROR),
    );

    let err = fetcher()
        .fetch(&apps, "app-1", "dep-1", AppLogType::Build)
        .await
        .unwrap_err();
    assert!(!err.is_not_reached());
    assert!(err.to_string().starts_with("failed to get build logs"));
}

#[tokio::test]
async fn test_failed_segment_aborts_bundle() {
    let base = segment_server().await;
    let apps = apps_with(
        AppLogType::Build,
        FakeLogs::Urls(vec![format!("{base}/a"), format!("{base}/broken")]),
    );

    let result = fetcher()
        .fetch(&apps, "app-1", "dep-1", AppLogType::Build)
        .await;
    tokio_test::assert_err!(result);
}

#[tokio::test]
async fn test_no_segments() {
    let logs = fetcher().fetch_historic(&[]).await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_each_log_type_checked_independently() {
    let base = segment_server().await;
    let apps = FakeApps::new(FakeState {
        logs: HashMap::from([
            (AppLogType::Build, FakeLogs::Status(StatusCode::BAD_REQUEST)),
            (AppLogType::Deploy, FakeLogs::Urls(vec![format!("{base}/b")])),
        ]),
        ..Default::default()
    });
    let fetcher = fetcher();

    let build = fetcher
        .fetch(&apps, "app-1", "dep-1", AppLogType::Build)
        .await
        .unwrap();
    let deploy = fetcher
        .fetch(&apps, "app-1", "dep-1", AppLogType::Deploy)
        .await
        .unwrap();
    assert!(build.is_empty());
    assert_eq!(deploy, b"B");
}
