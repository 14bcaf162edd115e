use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};

/// The lifecycle state of a plugin instance.
///
/// ```text
/// Constructed -> Initialized -> ActiveIdle <-> ActiveProcessing
///                                  ^  |
///                                  |  v
///                                Inactive
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LifecycleState {
    /// The instance was created, but not initialized yet.
    Constructed,
    /// The instance was initialized, and was never activated.
    Initialized,
    /// The instance was activated and then deactivated.
    Inactive,
    /// The instance is active, but not processing.
    ActiveIdle,
    /// The instance is active and processing.
    ActiveProcessing,
}

impl LifecycleState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            LifecycleState::ActiveIdle | LifecycleState::ActiveProcessing
        )
    }

    /// Whether the instance is initialized but not active, i.e. whether its audio ports can be
    /// re-defined.
    #[inline]
    pub fn is_inactive(self) -> bool {
        matches!(self, LifecycleState::Initialized | LifecycleState::Inactive)
    }

    #[inline]
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Constructed,
            1 => LifecycleState::Initialized,
            2 => LifecycleState::Inactive,
            3 => LifecycleState::ActiveIdle,
            _ => LifecycleState::ActiveProcessing,
        }
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            LifecycleState::Constructed => "not initialized",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Inactive => "inactive",
            LifecycleState::ActiveIdle => "active",
            LifecycleState::ActiveProcessing => "processing",
        };

        f.write_str(str)
    }
}

pub(crate) struct AtomicLifecycleState(AtomicU8);

impl AtomicLifecycleState {
    #[inline]
    pub const fn new() -> Self {
        Self(AtomicU8::new(LifecycleState::Constructed as u8))
    }

    #[inline]
    pub fn load(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, state: LifecycleState) {
        self.0.store(state as u8, Ordering::Release)
    }

    /// Atomically transitions from `current` to `new`.
    ///
    /// Returns the actual state as an error if it wasn't `current`.
    #[inline]
    pub fn transition(
        &self,
        current: LifecycleState,
        new: LifecycleState,
    ) -> Result<(), LifecycleState> {
        self.0
            .compare_exchange(
                current as u8,
                new as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(LifecycleState::from_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_from_expected_state() {
        let state = AtomicLifecycleState::new();
        assert_eq!(state.load(), LifecycleState::Constructed);

        assert_eq!(
            state.transition(LifecycleState::ActiveIdle, LifecycleState::ActiveProcessing),
            Err(LifecycleState::Constructed)
        );

        state.store(LifecycleState::ActiveIdle);
        assert!(state.load().is_active());
        assert_eq!(
            state.transition(LifecycleState::ActiveIdle, LifecycleState::ActiveProcessing),
            Ok(())
        );
        assert_eq!(state.load(), LifecycleState::ActiveProcessing);
    }

    #[test]
    fn inactive_states() {
        assert!(LifecycleState::Initialized.is_inactive());
        assert!(LifecycleState::Inactive.is_inactive());
        assert!(!LifecycleState::Constructed.is_inactive());
        assert!(!LifecycleState::ActiveIdle.is_inactive());
    }
}
