// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition session state.
//!
//! A session runs one transition end to end:
//!
//! ```text
//!   Idle ─► Cloning ─► Expanding ─► Fetching ─► Swapped ─► Shrinking ─► Done
//!              │           │            │           │
//!              └───────────┴────────────┴─► Aborted └─────────────────► Done
//! ```
//!
//! `Aborted` is reached before the swap (network, parse, or DOM failure) and
//! always resolves by plain navigation. After the swap the only way out is
//! `Done`, either by landing or by fading out.
//!
//! [`SessionLedger`] tracks which of the clone and the live element is
//! showing. Visibility only ever moves between the two as a handoff, so there
//! is no state in which both or neither are visible.

use core::fmt;

/// Phase of a transition session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, nothing touched yet.
    Idle,
    /// Measuring the source and building the overlay and clone.
    Cloning,
    /// Clone animating outward to its exploded rectangle.
    Expanding,
    /// Destination being fetched, parsed and swapped in.
    Fetching,
    /// New document in place; waiting for layout to settle.
    Swapped,
    /// Clone animating into the target, or fading out without one.
    Shrinking,
    /// Overlay removed. Terminal.
    Done,
    /// Gave up before the swap; the browser navigates instead. Terminal.
    Aborted,
}

impl Phase {
    /// Returns `true` for `Done` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns `true` if a session may move from `self` to `to`.
    #[must_use]
    pub const fn can_advance(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Cloning)
                | (Self::Cloning, Self::Expanding)
                | (Self::Expanding, Self::Fetching)
                | (Self::Fetching, Self::Swapped)
                | (Self::Swapped, Self::Shrinking)
                | (Self::Shrinking, Self::Done)
                | (Self::Swapped, Self::Done)
                | (Self::Cloning | Self::Expanding | Self::Fetching, Self::Aborted)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Cloning => "cloning",
            Self::Expanding => "expanding",
            Self::Fetching => "fetching",
            Self::Swapped => "swapped",
            Self::Shrinking => "shrinking",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// An illegal phase change was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot move a transition from {from} to {to}")]
pub struct PhaseError {
    /// Phase the session was in.
    pub from: Phase,
    /// Phase that was requested.
    pub to: Phase,
}

/// Enforces the legal phase order of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    /// A machine in [`Phase::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to `to`, returning the phase that was left.
    pub fn advance(&mut self, to: Phase) -> Result<Phase, PhaseError> {
        let from = self.phase;
        if !from.can_advance(to) {
            return Err(PhaseError { from, to });
        }
        self.phase = to;
        Ok(from)
    }
}

/// Which of the two candidates for "the shared element" is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visible {
    /// The live element in the document (source or target).
    Live,
    /// The animated clone in the overlay.
    Clone,
}

/// Records clone/live handoffs for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLedger {
    visible: Visible,
    handoffs: u32,
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLedger {
    /// A fresh ledger: the live source is showing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible: Visible::Live,
            handoffs: 0,
        }
    }

    /// Which element is showing.
    #[must_use]
    pub const fn visible(&self) -> Visible {
        self.visible
    }

    /// Number of handoffs so far.
    #[must_use]
    pub const fn handoffs(&self) -> u32 {
        self.handoffs
    }

    /// The clone is in the document and the live element has just been hidden.
    ///
    /// Returns `false` if the clone was already showing.
    pub fn hand_to_clone(&mut self) -> bool {
        self.hand_to(Visible::Clone)
    }

    /// The live element has just been revealed and the clone removed or
    /// faded.
    ///
    /// Returns `false` if the live element was already showing.
    pub fn hand_to_live(&mut self) -> bool {
        self.hand_to(Visible::Live)
    }

    fn hand_to(&mut self, to: Visible) -> bool {
        if self.visible == to {
            return false;
        }
        self.visible = to;
        self.handoffs += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_legal() {
        let mut m = PhaseMachine::new();
        for to in [
            Phase::Cloning,
            Phase::Expanding,
            Phase::Fetching,
            Phase::Swapped,
            Phase::Shrinking,
            Phase::Done,
        ] {
            m.advance(to).unwrap();
        }
        assert!(m.phase().is_terminal());
    }

    #[test]
    fn fetch_failure_aborts() {
        let mut m = PhaseMachine::new();
        m.advance(Phase::Cloning).unwrap();
        m.advance(Phase::Expanding).unwrap();
        m.advance(Phase::Fetching).unwrap();
        assert_eq!(m.advance(Phase::Aborted), Ok(Phase::Fetching));
        assert!(m.phase().is_terminal());
    }

    #[test]
    fn no_abort_after_swap() {
        let mut m = PhaseMachine::new();
        for to in [Phase::Cloning, Phase::Expanding, Phase::Fetching, Phase::Swapped] {
            m.advance(to).unwrap();
        }
        let err = m.advance(Phase::Aborted).unwrap_err();
        assert_eq!(err.from, Phase::Swapped);
        assert_eq!(m.phase(), Phase::Swapped, "failed advance leaves phase unchanged");
        assert_eq!(m.advance(Phase::Done), Ok(Phase::Swapped));
    }

    #[test]
    fn skipping_phases_is_rejected() {
        let mut m = PhaseMachine::new();
        assert!(m.advance(Phase::Fetching).is_err());
        assert!(m.advance(Phase::Done).is_err());
        assert!(!Phase::Done.can_advance(Phase::Idle));
    }

    #[test]
    fn ledger_alternates() {
        let mut ledger = SessionLedger::new();
        assert_eq!(ledger.visible(), Visible::Live);
        assert!(ledger.hand_to_clone());
        assert!(!ledger.hand_to_clone(), "double handoff is a no-op");
        assert!(ledger.hand_to_live());
        assert_eq!(ledger.handoffs(), 2);
    }
}
