//! Hooks invoked for every authorization decision.

use std::sync::Arc;

use bridge_permissions::AccessDecision;
use tracing::{debug, warn};

/// Phase of the permission chain a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    /// Subject-level checks, before any target object is fetched.
    Subject,
    /// Object-level checks against a loaded target.
    Object,
}

impl CheckStage {
    /// Returns a short label for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Object => "object",
        }
    }
}

/// Observer invoked whenever the adapter produces an authorization decision.
pub trait DecisionObserver: Send + Sync {
    /// Records the decision for the supplied tool and chain stage.
    fn on_decision(&self, tool: &str, stage: CheckStage, decision: &AccessDecision);
}

/// Observer that emits decisions to the tracing system.
#[derive(Default)]
pub struct TracingDecisionObserver;

impl DecisionObserver for TracingDecisionObserver {
    fn on_decision(&self, tool: &str, stage: CheckStage, decision: &AccessDecision) {
        if decision.is_granted() {
            debug!(tool, stage = stage.as_str(), "authorization granted");
        } else {
            warn!(
                tool,
                stage = stage.as_str(),
                message = decision.message().unwrap_or_default(),
                "authorization denied"
            );
        }
    }
}

/// Composite observer that forwards decisions to a collection of observers.
pub struct CompositeDecisionObserver {
    observers: Vec<Arc<dyn DecisionObserver>>,
}

impl CompositeDecisionObserver {
    /// Creates a new composite observer from the supplied list.
    #[must_use]
    pub fn new<I>(observers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn DecisionObserver>>,
    {
        Self {
            observers: observers.into_iter().collect(),
        }
    }

    /// Adds an observer to the composite set.
    pub fn push(&mut self, observer: Arc<dyn DecisionObserver>) {
        self.observers.push(observer);
    }
}

impl DecisionObserver for CompositeDecisionObserver {
    fn on_decision(&self, tool: &str, stage: CheckStage, decision: &AccessDecision) {
        for observer in &self.observers {
            observer.on_decision(tool, stage, decision);
        }
    }
}
