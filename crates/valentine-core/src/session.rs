use crate::celebration::Celebration;
use crate::content::Content;
use crate::dodge::DodgeOffset;
use crate::rng::SimpleRng;
use crate::stage::{Event, Outcome, Stage};

/// One run of the greeting: the current stage plus the interaction state
/// of the reasons, letter and question screens.
///
/// Every transition goes through [`Session::apply`]. Events that are not
/// legal for the current stage come back as [`Outcome::Ignored`] and leave
/// the session untouched.
#[derive(Debug, Clone)]
pub struct Session {
    content: Content,
    stage: Stage,
    reason_index: usize,
    dodge_offset: DodgeOffset,
    letter_open: bool,
    celebration: Celebration,
    rng: SimpleRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Content::default())
    }
}

impl Session {
    pub fn new(content: Content) -> Self {
        Self::with_rng(content, SimpleRng::new())
    }

    /// Session whose dodge offsets are reproducible.
    pub fn with_seed(content: Content, seed: u64) -> Self {
        Self::with_rng(content, SimpleRng::with_seed(seed))
    }

    fn with_rng(content: Content, rng: SimpleRng) -> Self {
        Self {
            content,
            stage: Stage::Identity,
            reason_index: 0,
            dodge_offset: DodgeOffset::ORIGIN,
            letter_open: false,
            celebration: Celebration::new(),
            rng,
        }
    }

    /// Apply one user event.
    pub fn apply(&mut self, event: Event) -> Outcome {
        let outcome = match (self.stage, event) {
            (Stage::Identity, Event::ConfirmIdentityYes) => self.move_to(Stage::Welcome),
            (Stage::Identity, Event::ConfirmIdentityNo) => self.move_to(Stage::Denied),
            (Stage::Welcome, Event::Enter) => self.move_to(Stage::Reasons),
            (Stage::Reasons, Event::AdvanceReason) => {
                if self.is_last_reason() {
                    self.move_to(Stage::Journey)
                } else {
                    self.reason_index += 1;
                    Outcome::Updated
                }
            }
            (Stage::Journey, Event::Enter) => self.move_to(Stage::Letter),
            (Stage::Letter, Event::OpenLetter) => {
                self.letter_open = true;
                Outcome::Updated
            }
            (Stage::Letter, Event::Enter) if self.letter_open => self.move_to(Stage::Question),
            (Stage::Question, Event::DodgeProposal) => {
                self.dodge_offset = DodgeOffset::random(&mut self.rng);
                Outcome::Updated
            }
            (Stage::Question, Event::AcceptProposal) => {
                self.celebration.arm();
                self.move_to(Stage::Success)
            }
            _ => Outcome::Ignored,
        };

        match outcome {
            Outcome::Moved { from, to } => log::debug!("{:?}: {} -> {}", event, from, to),
            Outcome::Updated => log::debug!("{:?} in {}", event, self.stage),
            Outcome::Ignored => log::trace!("ignored {:?} in {}", event, self.stage),
        }
        outcome
    }

    fn move_to(&mut self, to: Stage) -> Outcome {
        let from = self.stage;
        self.stage = to;
        Outcome::Moved { from, to }
    }

    /// Events a presentation layer may offer right now.
    pub fn offered_events(&self) -> Vec<Event> {
        match self.stage {
            Stage::Identity => vec![Event::ConfirmIdentityYes, Event::ConfirmIdentityNo],
            Stage::Welcome | Stage::Journey => vec![Event::Enter],
            Stage::Reasons => vec![Event::AdvanceReason],
            Stage::Letter => {
                if self.letter_open {
                    vec![Event::Enter]
                } else {
                    vec![Event::OpenLetter]
                }
            }
            Stage::Question => vec![Event::AcceptProposal, Event::DodgeProposal],
            Stage::Denied | Stage::Success => Vec::new(),
        }
    }

    pub fn confirm_identity_yes(&mut self) -> Outcome {
        self.apply(Event::ConfirmIdentityYes)
    }

    pub fn confirm_identity_no(&mut self) -> Outcome {
        self.apply(Event::ConfirmIdentityNo)
    }

    pub fn enter(&mut self) -> Outcome {
        self.apply(Event::Enter)
    }

    pub fn advance_reason(&mut self) -> Outcome {
        self.apply(Event::AdvanceReason)
    }

    pub fn open_letter(&mut self) -> Outcome {
        self.apply(Event::OpenLetter)
    }

    pub fn accept_proposal(&mut self) -> Outcome {
        self.apply(Event::AcceptProposal)
    }

    pub fn dodge_proposal(&mut self) -> Outcome {
        self.apply(Event::DodgeProposal)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn reason_index(&self) -> usize {
        self.reason_index
    }

    pub fn current_reason(&self) -> Option<&str> {
        self.content.reasons.get(self.reason_index).map(String::as_str)
    }

    /// True while the card on screen is the final one.
    pub fn is_last_reason(&self) -> bool {
        self.reason_index + 1 >= self.content.reasons.len()
    }

    pub fn dodge_offset(&self) -> DodgeOffset {
        self.dodge_offset
    }

    pub fn is_letter_open(&self) -> bool {
        self.letter_open
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    /// Front ends tick the celebration from their frame loop.
    pub fn celebration_mut(&mut self) -> &mut Celebration {
        &mut self.celebration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dodge::DODGE_RANGE;

    fn session() -> Session {
        Session::with_seed(Content::default(), 42)
    }

    /// Session driven to `stage` through legal events only.
    fn session_at(stage: Stage) -> Session {
        let mut s = session();
        let path: &[Event] = match stage {
            Stage::Identity => &[],
            Stage::Denied => &[Event::ConfirmIdentityNo],
            Stage::Welcome => &[Event::ConfirmIdentityYes],
            Stage::Reasons => &[Event::ConfirmIdentityYes, Event::Enter],
            _ => &[Event::ConfirmIdentityYes, Event::Enter],
        };
        for &e in path {
            assert!(!s.apply(e).is_ignored());
        }
        if matches!(
            stage,
            Stage::Journey | Stage::Letter | Stage::Question | Stage::Success
        ) {
            while s.stage() == Stage::Reasons {
                s.advance_reason();
            }
        }
        if matches!(stage, Stage::Letter | Stage::Question | Stage::Success) {
            s.enter();
        }
        if matches!(stage, Stage::Question | Stage::Success) {
            s.open_letter();
            s.enter();
        }
        if stage == Stage::Success {
            s.accept_proposal();
        }
        assert_eq!(s.stage(), stage);
        s
    }

    /// Snapshot of everything observable, for "nothing changed" checks.
    fn snapshot(s: &Session) -> (Stage, usize, DodgeOffset, bool, u32, bool) {
        (
            s.stage(),
            s.reason_index(),
            s.dodge_offset(),
            s.is_letter_open(),
            s.celebration().fire_count(),
            s.celebration().is_running(),
        )
    }

    #[test]
    fn test_starts_at_identity() {
        let s = session();
        assert_eq!(s.stage(), Stage::Identity);
        assert_eq!(s.reason_index(), 0);
        assert_eq!(s.dodge_offset(), DodgeOffset::ORIGIN);
        assert!(!s.is_letter_open());
        assert_eq!(s.celebration().fire_count(), 0);
    }

    #[test]
    fn test_identity_yes_goes_to_welcome() {
        let mut s = session();
        assert_eq!(
            s.confirm_identity_yes(),
            Outcome::Moved {
                from: Stage::Identity,
                to: Stage::Welcome
            }
        );
    }

    #[test]
    fn test_identity_no_is_a_dead_end() {
        let mut s = session();
        s.confirm_identity_no();
        assert_eq!(s.stage(), Stage::Denied);
        assert!(s.is_terminal());
        assert!(s.offered_events().is_empty());
        for &event in Event::all() {
            assert_eq!(s.apply(event), Outcome::Ignored);
            assert_eq!(s.stage(), Stage::Denied);
        }
    }

    #[test]
    fn test_identity_only_leads_to_welcome_or_denied() {
        for &event in Event::all() {
            let mut s = session();
            s.apply(event);
            assert!(
                matches!(s.stage(), Stage::Identity | Stage::Welcome | Stage::Denied),
                "{:?} led to {}",
                event,
                s.stage()
            );
        }
    }

    #[test]
    fn test_reason_walk_pivots_at_last_index() {
        let mut s = session();
        s.confirm_identity_yes();
        s.enter();
        assert_eq!(s.stage(), Stage::Reasons);
        assert_eq!(s.reason_index(), 0);

        let n = s.content().reason_count();
        assert_eq!(n, 11);
        for i in 1..n {
            assert_eq!(s.advance_reason(), Outcome::Updated);
            assert_eq!(s.stage(), Stage::Reasons);
            assert_eq!(s.reason_index(), i);
        }
        assert_eq!(s.reason_index(), 10);
        assert!(s.is_last_reason());

        assert_eq!(
            s.advance_reason(),
            Outcome::Moved {
                from: Stage::Reasons,
                to: Stage::Journey
            }
        );
        assert_eq!(s.reason_index(), 10);

        // No overflow once the stage moved on
        s.advance_reason();
        assert_eq!(s.reason_index(), 10);
        assert_eq!(s.stage(), Stage::Journey);
    }

    #[test]
    fn test_single_reason_content() {
        let content = Content {
            reasons: vec!["Only one.".to_string()],
            ..Content::default()
        };
        let mut s = Session::with_seed(content, 1);
        s.confirm_identity_yes();
        s.enter();
        assert!(s.is_last_reason());
        assert_eq!(s.current_reason(), Some("Only one."));
        s.advance_reason();
        assert_eq!(s.stage(), Stage::Journey);
        assert_eq!(s.reason_index(), 0);
    }

    #[test]
    fn test_current_reason_follows_index() {
        let mut s = session_at(Stage::Reasons);
        assert_eq!(s.current_reason(), Some("Your true smile."));
        s.advance_reason();
        assert_eq!(s.current_reason(), Some("The way you support me, always."));
    }

    #[test]
    fn test_letter_requires_opening() {
        let mut s = session_at(Stage::Letter);
        assert!(!s.is_letter_open());
        assert_eq!(s.enter(), Outcome::Ignored);
        assert_eq!(s.stage(), Stage::Letter);

        assert_eq!(s.open_letter(), Outcome::Updated);
        assert!(s.is_letter_open());
        assert_eq!(
            s.enter(),
            Outcome::Moved {
                from: Stage::Letter,
                to: Stage::Question
            }
        );
    }

    #[test]
    fn test_open_letter_is_idempotent() {
        let mut s = session_at(Stage::Letter);
        s.open_letter();
        s.open_letter();
        assert!(s.is_letter_open());
        assert_eq!(s.stage(), Stage::Letter);
    }

    #[test]
    fn test_dodge_keeps_stage_and_stays_in_bounds() {
        let mut s = session_at(Stage::Question);
        for _ in 0..500 {
            assert_eq!(s.dodge_proposal(), Outcome::Updated);
            assert_eq!(s.stage(), Stage::Question);
            let offset = s.dodge_offset();
            assert!(offset.is_within_bounds());
        }
    }

    #[test]
    fn test_dodge_offsets_reproducible_with_seed() {
        let mut a = session_at(Stage::Question);
        let mut b = session_at(Stage::Question);
        for _ in 0..10 {
            a.dodge_proposal();
            b.dodge_proposal();
            assert_eq!(a.dodge_offset(), b.dodge_offset());
        }
    }

    #[test]
    fn test_accept_arms_celebration_once() {
        let mut s = session_at(Stage::Question);
        s.dodge_proposal();
        assert_eq!(
            s.accept_proposal(),
            Outcome::Moved {
                from: Stage::Question,
                to: Stage::Success
            }
        );
        assert!(s.celebration().is_running());

        // Repeated accept (e.g. a stale click after a re-render) does nothing
        assert_eq!(s.accept_proposal(), Outcome::Ignored);

        let now = std::time::Duration::from_millis(0);
        assert_eq!(s.celebration_mut().tick(now).len(), 2);
        assert_eq!(s.celebration().fire_count(), 1);
        assert!(!s.celebration_mut().arm());
        assert_eq!(s.celebration().fire_count(), 1);
    }

    #[test]
    fn test_only_accept_reaches_success() {
        for &stage in Stage::all() {
            if stage == Stage::Success {
                continue;
            }
            for &event in Event::all() {
                let mut s = session_at(stage);
                s.apply(event);
                if s.stage() == Stage::Success {
                    assert_eq!(stage, Stage::Question);
                    assert_eq!(event, Event::AcceptProposal);
                }
            }
        }
    }

    #[test]
    fn test_terminal_stages_are_final() {
        for stage in [Stage::Denied, Stage::Success] {
            let mut s = session_at(stage);
            let before = snapshot(&s);
            for &event in Event::all() {
                assert_eq!(s.apply(event), Outcome::Ignored);
            }
            assert_eq!(snapshot(&s), before);
        }
    }

    #[test]
    fn test_offered_events_match_apply() {
        for &stage in Stage::all() {
            for letter_open in [false, true] {
                if letter_open && stage != Stage::Letter {
                    continue;
                }
                let base = {
                    let mut s = session_at(stage);
                    if letter_open {
                        s.open_letter();
                    }
                    s
                };
                let offered = base.offered_events();
                for &event in Event::all() {
                    let mut s = base.clone();
                    let before = snapshot(&s);
                    let outcome = s.apply(event);
                    if offered.contains(&event) {
                        assert!(
                            !outcome.is_ignored(),
                            "{:?} offered but ignored in {}",
                            event,
                            stage
                        );
                    } else {
                        assert!(
                            outcome.is_ignored(),
                            "{:?} not offered but applied in {}",
                            event,
                            stage
                        );
                        assert_eq!(snapshot(&s), before);
                    }
                }
            }
        }
    }

    #[test]
    fn test_wrong_stage_events_do_not_corrupt_state() {
        let mut s = session();
        for event in [
            Event::Enter,
            Event::AdvanceReason,
            Event::OpenLetter,
            Event::AcceptProposal,
            Event::DodgeProposal,
        ] {
            assert_eq!(s.apply(event), Outcome::Ignored);
        }
        assert_eq!(s.stage(), Stage::Identity);
        assert_eq!(s.dodge_offset(), DodgeOffset::ORIGIN);
        assert!(!s.is_letter_open());
        assert_eq!(s.celebration().fire_count(), 0);
        assert!(!s.celebration().is_running());
    }

    #[test]
    fn test_no_stage_revisited() {
        let mut s = session();
        let mut seen = vec![s.stage()];
        let script = [Event::ConfirmIdentityYes, Event::Enter]
            .into_iter()
            .chain(std::iter::repeat(Event::AdvanceReason).take(11))
            .chain([
                Event::Enter,
                Event::OpenLetter,
                Event::Enter,
                Event::DodgeProposal,
                Event::DodgeProposal,
                Event::AcceptProposal,
            ]);
        for event in script {
            if let Outcome::Moved { to, .. } = s.apply(event) {
                assert!(!seen.contains(&to), "{} revisited", to);
                seen.push(to);
            }
        }
        assert_eq!(
            seen,
            vec![
                Stage::Identity,
                Stage::Welcome,
                Stage::Reasons,
                Stage::Journey,
                Stage::Letter,
                Stage::Question,
                Stage::Success
            ]
        );
    }
}
