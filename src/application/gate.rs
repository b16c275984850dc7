//! Confirmation step in front of destructive actions.

/// A destructive action waiting for the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction<A> {
    pub action: A,
    pub target: i64,
}

/// `Closed` or `Open(action, target)`. At most one action is pending; opening
/// again replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationGate<A> {
    Closed,
    Open(PendingAction<A>),
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<A: Copy> ConfirmationGate<A> {
    pub fn open(&mut self, action: A, target: i64) {
        *self = Self::Open(PendingAction { action, target });
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn pending(&self) -> Option<PendingAction<A>> {
        match self {
            Self::Open(pending) => Some(*pending),
            Self::Closed => None,
        }
    }

    /// Close the gate and hand back the action to run, if any.
    pub fn confirm(&mut self) -> Option<PendingAction<A>> {
        match std::mem::take(self) {
            Self::Open(pending) => Some(pending),
            Self::Closed => None,
        }
    }

    /// Close the gate, discarding the pending action.
    pub fn cancel(&mut self) -> Option<PendingAction<A>> {
        self.confirm()
    }
}
