//! The scaling action set shared by the environment and the decision service

use serde::{Deserialize, Serialize};
use std::fmt;

use autoscale_rl_core::{Action, DiscreteAction};

/// Capacity adjustment applied before each workload draw.
///
/// The integer codes are baked into trained policies and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalingAction {
    /// Leave capacity unchanged
    NoOp,
    /// Add one capacity unit, saturating at the configured maximum
    ScaleUp,
    /// Remove one capacity unit, saturating at one
    ScaleDown,
}

impl ScalingAction {
    /// All actions in code order
    pub const ALL: [Self; 3] = [Self::NoOp, Self::ScaleUp, Self::ScaleDown];

    /// Stable integer code
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::NoOp => 0,
            Self::ScaleUp => 1,
            Self::ScaleDown => 2,
        }
    }

    /// Action for a code, `None` for anything outside the closed set
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::NoOp),
            1 => Some(Self::ScaleUp),
            2 => Some(Self::ScaleDown),
            _ => None,
        }
    }

    /// Operator-facing name used on the wire
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NoOp => "DO_NOTHING",
            Self::ScaleUp => "ADD_SERVER",
            Self::ScaleDown => "REMOVE_SERVER",
        }
    }

    /// Apply the action to a unit count with saturating bounds `[1, max_units]`
    #[must_use]
    pub fn apply(self, active_units: u32, max_units: u32) -> u32 {
        let next = match self {
            Self::NoOp => active_units,
            Self::ScaleUp => active_units.saturating_add(1).min(max_units),
            Self::ScaleDown => active_units.saturating_sub(1).max(1),
        };
        next.clamp(1, max_units.max(1))
    }
}

impl fmt::Display for ScalingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for ScalingAction {
    type Error = autoscale_rl_core::RLError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| {
            autoscale_rl_core::RLError::InvalidAction(format!("unknown action code {code}"))
        })
    }
}

impl Action for ScalingAction {
    fn to_vec(&self) -> Vec<f64> {
        vec![f64::from(self.code())]
    }
}

impl DiscreteAction for ScalingAction {
    const COUNT: usize = 3;

    fn index(&self) -> usize {
        self.code() as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().and_then(Self::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ScalingAction::NoOp.code(), 0);
        assert_eq!(ScalingAction::ScaleUp.code(), 1);
        assert_eq!(ScalingAction::ScaleDown.code(), 2);
        for action in ScalingAction::ALL {
            assert_eq!(ScalingAction::from_code(action.code()), Some(action));
        }
        assert_eq!(ScalingAction::from_code(3), None);
        assert!(ScalingAction::try_from(99).is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(ScalingAction::NoOp.name(), "DO_NOTHING");
        assert_eq!(ScalingAction::ScaleUp.name(), "ADD_SERVER");
        assert_eq!(ScalingAction::ScaleDown.to_string(), "REMOVE_SERVER");
    }

    #[test]
    fn test_apply_saturates() {
        assert_eq!(ScalingAction::ScaleUp.apply(10, 10), 10);
        assert_eq!(ScalingAction::ScaleDown.apply(1, 10), 1);
        assert_eq!(ScalingAction::ScaleUp.apply(4, 10), 5);
        assert_eq!(ScalingAction::ScaleDown.apply(4, 10), 3);
        assert_eq!(ScalingAction::NoOp.apply(7, 10), 7);
    }
}
