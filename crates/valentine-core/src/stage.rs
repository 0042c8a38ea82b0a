use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen currently presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Identity,
    Denied,
    Welcome,
    Reasons,
    Journey,
    Letter,
    Question,
    Success,
}

impl Stage {
    /// All stages in presentation order, `Denied` after the gate it forks from.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Identity,
            Stage::Denied,
            Stage::Welcome,
            Stage::Reasons,
            Stage::Journey,
            Stage::Letter,
            Stage::Question,
            Stage::Success,
        ]
    }

    /// No transition is offered from a terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Denied | Stage::Success)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::Denied => "denied",
            Stage::Welcome => "welcome",
            Stage::Reasons => "reasons",
            Stage::Journey => "journey",
            Stage::Letter => "letter",
            Stage::Question => "question",
            Stage::Success => "success",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A discrete user action reported by a presentation layer. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    ConfirmIdentityYes,
    ConfirmIdentityNo,
    Enter,
    AdvanceReason,
    OpenLetter,
    AcceptProposal,
    DodgeProposal,
}

impl Event {
    pub fn all() -> &'static [Event] {
        &[
            Event::ConfirmIdentityYes,
            Event::ConfirmIdentityNo,
            Event::Enter,
            Event::AdvanceReason,
            Event::OpenLetter,
            Event::AcceptProposal,
            Event::DodgeProposal,
        ]
    }
}

/// What applying an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stage changed.
    Moved { from: Stage, to: Stage },
    /// Auxiliary state changed, stage did not.
    Updated,
    /// The event is not legal here; nothing changed.
    Ignored,
}

impl Outcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }
}
