//! Observed deployment phase tracking
//!
//! The platform owns the deployment state machine; this side only folds the
//! phases it polls into a record of transitions.

use apps_api::DeploymentPhase;

/// A change between two consecutive observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    /// None on the first observation
    pub from: Option<DeploymentPhase>,
    pub to: DeploymentPhase,
}

/// Fold state over polled phases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    current: Option<DeploymentPhase>,
    observations: u32,
}

impl PhaseTracker {
    /// Create a tracker that has not observed anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed phase
    pub fn current(&self) -> Option<&DeploymentPhase> {
        self.current.as_ref()
    }

    /// Number of polls folded in
    pub fn observations(&self) -> u32 {
        self.observations
    }

    /// Whether the last observed phase is terminal
    pub fn is_settled(&self) -> bool {
        self.current.as_ref().is_some_and(|p| p.is_terminal())
    }

    /// Fold one observation. Yields a transition only when the phase differs
    /// from the previous one.
    pub fn observe(self, phase: DeploymentPhase) -> (Self, Option<PhaseTransition>) {
        let transition = (self.current.as_ref() != Some(&phase)).then(|| PhaseTransition {
            from: self.current.clone(),
            to: phase.clone(),
        });
        let next = Self {
            current: Some(phase),
            observations: self.observations + 1,
        };
        (next, transition)
    }
}
