//! Phase tracking tests

use app_action::deploy::fsm::{PhaseTracker, PhaseTransition};
use apps_api::DeploymentPhase;

#[test]
fn test_tracker_initial_state() {
    let tracker = PhaseTracker::new();
    assert_eq!(tracker.current(), None);
    assert_eq!(tracker.observations(), 0);
    assert!(!tracker.is_settled());
}

#[test]
fn test_tracker_success_flow() {
    let (tracker, first) = PhaseTracker::new().observe(DeploymentPhase::PendingBuild);
    assert_eq!(
        first,
        Some(PhaseTransition {
            from: None,
            to: DeploymentPhase::PendingBuild
        })
    );

    let (tracker, repeat) = tracker.observe(DeploymentPhase::PendingBuild);
    assert_eq!(repeat, None);

    let (tracker, _) = tracker.observe(DeploymentPhase::Building);
    let (tracker, _) = tracker.observe(DeploymentPhase::Deploying);
    assert!(!tracker.is_settled());

    let (tracker, last) = tracker.observe(DeploymentPhase::Active);
    assert_eq!(last.map(|t| t.from), Some(Some(DeploymentPhase::Deploying)));
    assert!(tracker.is_settled());
    assert_eq!(tracker.observations(), 5);
}

#[test]
fn test_tracker_failure_flows_settle() {
    for terminal in [
        DeploymentPhase::Error,
        DeploymentPhase::Canceled,
        DeploymentPhase::Superseded,
    ] {
        let (tracker, _) = PhaseTracker::new().observe(DeploymentPhase::Building);
        let (tracker, transition) = tracker.observe(terminal.clone());
        assert!(tracker.is_settled(), "{terminal}");
        assert_eq!(transition.map(|t| t.to), Some(terminal));
    }
}

#[test]
fn test_unknown_phase_keeps_polling() {
    let (tracker, _) = PhaseTracker::new().observe(DeploymentPhase::Unknown);
    assert!(!tracker.is_settled());

    let warming = DeploymentPhase::Other("WARMING_UP".to_string());
    let (tracker, transition) = tracker.observe(warming.clone());
    assert!(!tracker.is_settled());
    assert_eq!(tracker.current(), Some(&warming));
    assert_eq!(transition.map(|t| t.to.to_string()).as_deref(), Some("WARMING_UP"));
}
