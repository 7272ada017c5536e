pub mod rapid_change;
pub mod stall;

use crate::window::ChannelWindow;
use crate::{AlertRule, Evaluation};
use rapid_change::RapidChangeRule;
use smokemon_common::types::{ChannelConfig, PolicyKind};
use stall::StallRule;

/// The closed set of alert policies a channel can be evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPolicy {
    RapidChange(RapidChangeRule),
    Stall(StallRule),
}

impl AlertPolicy {
    pub fn for_kind(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::RapidChange => AlertPolicy::RapidChange(RapidChangeRule),
            PolicyKind::Stall => AlertPolicy::Stall(StallRule),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            AlertPolicy::RapidChange(_) => PolicyKind::RapidChange,
            AlertPolicy::Stall(_) => PolicyKind::Stall,
        }
    }

    fn rule(&self) -> &dyn AlertRule {
        match self {
            AlertPolicy::RapidChange(rule) => rule as &dyn AlertRule,
            AlertPolicy::Stall(rule) => rule,
        }
    }

    pub fn evaluate(&self, config: &ChannelConfig, window: &ChannelWindow) -> Evaluation {
        self.rule().evaluate(config, window)
    }
}
