//! State machine trait for lifecycle enums.
//!
//! Gives lifecycle enums (such as the per-turn response state) a consistent
//! way to validate transitions.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for TurnState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Pending, Answered) | (Pending, Rejected))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Answered, Rejected],
///             Answered | Rejected => vec![],
///         }
///     }
/// }
///
/// let next = TurnState::Pending.transition_to(TurnState::Answered)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        Warming,
        On,
        Broken,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Light::*;
            matches!(
                (self, target),
                (Off, Warming) | (Warming, On) | (Warming, Broken) | (On, Broken)
            )
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Light::*;
            match self {
                Off => vec![Warming],
                Warming => vec![On, Broken],
                On => vec![Broken],
                Broken => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Light::Off.transition_to(Light::Warming), Ok(Light::Warming));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        assert!(Light::Off.transition_to(Light::On).is_err());
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::Off.is_terminal());
        assert!(!Light::On.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for light in [Light::Off, Light::Warming, Light::On, Light::Broken] {
            for target in light.valid_transitions() {
                assert!(light.can_transition_to(&target), "{:?} -> {:?}", light, target);
            }
        }
    }
}
