use std::sync::Arc;

use app_action::deploy::delete::{Deleter, Options};
use app_action::deploy::preview::PreviewTarget;
use app_action::errors::DeployerError;

use crate::fake::{app, FakeApps, FakeState, RecordingReporter};

fn deleter(apps: &Arc<FakeApps>, reporter: &Arc<RecordingReporter>, options: Options) -> Deleter {
    Deleter::new(apps.clone(), reporter.clone(), options)
}

fn platform() -> Arc<FakeApps> {
    Arc::new(FakeApps::new(FakeState {
        apps: vec![
            app("id-1", "app1"),
            app("id-2", "app2"),
            app("id-preview", &PreviewTarget::new("acme", "web", "42/merge").app_name()),
        ],
        ..Default::default()
    }))
}

#[tokio::test]
async fn test_delete_by_id() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());
    let options = Options {
        app_id: Some("id-2".to_string()),
        ..Default::default()
    };

    let deleted = deleter(&apps, &reporter, options).delete().await.unwrap();

    assert!(deleted.is_none());
    assert_eq!(apps.calls(), ["delete:id-2"]);
    assert!(reporter.lines().contains(&"deleted app id-2".to_string()));
}

#[tokio::test]
async fn test_delete_by_name() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());
    let options = Options {
        app_name: Some("app1".to_string()),
        ..Default::default()
    };

    let deleted = deleter(&apps, &reporter, options).delete().await.unwrap();

    assert_eq!(deleted.map(|a| a.id), Some("id-1".to_string()));
    assert_eq!(apps.count("delete:id-1"), 1);
}

#[tokio::test]
async fn test_delete_unknown_name_fails() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());
    let options = Options {
        app_name: Some("app3".to_string()),
        ..Default::default()
    };

    let err = deleter(&apps, &reporter, options).delete().await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(apps.count("delete"), 0);
}

#[tokio::test]
async fn test_delete_preview() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());
    let options = Options {
        preview: Some(PreviewTarget::new("acme", "web", "42/merge").with_branch("feature-x")),
        ..Default::default()
    };

    let deleted = deleter(&apps, &reporter, options).delete().await.unwrap();

    assert_eq!(deleted.map(|a| a.id), Some("id-preview".to_string()));
    assert_eq!(apps.count("delete:id-preview"), 1);
}

#[tokio::test]
async fn test_delete_missing_preview_is_a_noop() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());
    let options = Options {
        preview: Some(PreviewTarget::new("acme", "web", "43/merge")),
        ..Default::default()
    };

    let deleted = deleter(&apps, &reporter, options).delete().await.unwrap();

    assert!(deleted.is_none());
    assert_eq!(apps.count("delete"), 0);
    assert!(reporter
        .lines()
        .iter()
        .any(|l| l.ends_with("does not exist, nothing to delete")));
}

#[tokio::test]
async fn test_delete_requires_exactly_one_selector() {
    let apps = platform();
    let reporter = Arc::new(RecordingReporter::default());

    for options in [
        Options::default(),
        Options {
            app_id: Some("id-1".to_string()),
            app_name: Some("app1".to_string()),
            ..Default::default()
        },
    ] {
        let err = deleter(&apps, &reporter, options).delete().await.unwrap_err();
        assert!(matches!(err, DeployerError::InputError(_)));
    }
    assert!(apps.calls().is_empty());
}
