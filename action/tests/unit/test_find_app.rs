//! App lookup tests

use app_action::http::apps::find_app_by_name;

use crate::fake::{app, FakeApps, FakeState};

#[tokio::test]
async fn test_find_app_by_name() {
    let app1 = app("id-1", "app1");
    let app2 = app("id-2", "app2");

    let cases = [
        ("app1", Some(app1.clone())),
        ("app2", Some(app2.clone())),
        ("app3", None),
    ];

    for (name, expected) in cases {
        let apps = FakeApps::new(FakeState {
            apps: vec![app1.clone(), app2.clone()],
            ..Default::default()
        });
        let found = tokio_test::assert_ok!(find_app_by_name(&apps, name).await);
        assert_eq!(found, expected, "{name}");
    }
}
