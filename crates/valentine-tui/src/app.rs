use crate::animations::ConfettiField;
use crate::config::Config;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::time::Duration;
use valentine_core::{Event, HeartField, Outcome, Session, SimpleRng, Stage};

/// Frames a stage takes to fade in
pub const TRANSITION_FRAMES: u8 = 12;

/// Rows scrolled by PageUp/PageDown on the journey
const PAGE_ROWS: i32 = 5;

/// Largest dodge in cells, horizontally and vertically
pub const DODGE_CELLS_X: f32 = 14.0;
pub const DODGE_CELLS_Y: f32 = 3.0;

/// Result of handling an input event
pub enum AppAction {
    Continue,
    Quit,
}

/// Something on screen the user can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    IdentityYes,
    IdentityNo,
    /// "Come in", "Next Chapter" and the letter's last button
    Continue,
    ReasonCard,
    Envelope,
    ProposalYes,
    ProposalNo,
}

impl ButtonId {
    pub fn event(&self) -> Event {
        match self {
            ButtonId::IdentityYes => Event::ConfirmIdentityYes,
            ButtonId::IdentityNo => Event::ConfirmIdentityNo,
            ButtonId::Continue => Event::Enter,
            ButtonId::ReasonCard => Event::AdvanceReason,
            ButtonId::Envelope => Event::OpenLetter,
            ButtonId::ProposalYes => Event::AcceptProposal,
            ButtonId::ProposalNo => Event::DodgeProposal,
        }
    }
}

/// Screen rectangle in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

/// The main application state
pub struct App {
    pub session: Session,
    /// Background hearts, generated once
    pub hearts: HeartField,
    pub confetti: ConfettiField,
    /// Index into `buttons_for_stage()`
    pub focus: usize,
    /// Dodge when the pointer or focus lands on "no"
    pub hover_dodge: bool,
    pub journey_scroll: u16,
    /// Set by the renderer from the laid-out journey height
    pub journey_max_scroll: u16,
    /// Frame at which each journey entry first scrolled into view
    pub journey_reveals: Vec<Option<u64>>,
    /// Frames left in the current fade-in
    pub transition: u8,
    /// Button rectangles of the last rendered frame, for mouse hit-testing
    pub buttons: Vec<(ButtonId, Rect)>,
    /// Time since start, advanced by `tick_at`
    pub now: Duration,
    /// When the current stage was entered
    pub stage_entered: Duration,
    pub frame: u64,
    hovering_no: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SimpleRng::with_seed(seed),
            None => SimpleRng::new(),
        };
        let hearts = HeartField::generate(&mut rng, config.heart_count);
        let session = match config.seed {
            Some(seed) => Session::with_seed(config.content, seed),
            None => Session::new(config.content),
        };
        let journey_len = session.content().journey.len();
        Self {
            session,
            hearts,
            confetti: ConfettiField::new(),
            focus: 0,
            hover_dodge: config.hover_dodge,
            journey_scroll: 0,
            journey_max_scroll: 0,
            journey_reveals: vec![None; journey_len],
            transition: TRANSITION_FRAMES,
            buttons: Vec::new(),
            now: Duration::ZERO,
            stage_entered: Duration::ZERO,
            frame: 0,
            hovering_no: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// Buttons the current stage offers, in focus order.
    pub fn buttons_for_stage(&self) -> Vec<ButtonId> {
        match self.session.stage() {
            Stage::Identity => vec![ButtonId::IdentityYes, ButtonId::IdentityNo],
            Stage::Welcome | Stage::Journey => vec![ButtonId::Continue],
            Stage::Reasons => vec![ButtonId::ReasonCard],
            Stage::Letter => {
                if self.session.is_letter_open() {
                    vec![ButtonId::Continue]
                } else {
                    vec![ButtonId::Envelope]
                }
            }
            Stage::Question => vec![ButtonId::ProposalYes, ButtonId::ProposalNo],
            Stage::Denied | Stage::Success => Vec::new(),
        }
    }

    pub fn focused_button(&self) -> Option<ButtonId> {
        self.buttons_for_stage().get(self.focus).copied()
    }

    /// Faster ticks while something is moving
    pub fn get_tick_rate(&self) -> Duration {
        let animating = !self.hearts.is_empty()
            || self.transition > 0
            || self.session.celebration().is_running()
            || !self.confetti.is_empty();
        if animating {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    /// Advance animations to `now` (time since start).
    pub fn tick_at(&mut self, now: Duration) {
        self.now = now;
        self.frame += 1;
        self.transition = self.transition.saturating_sub(1);

        let bursts = self.session.celebration_mut().tick(now);
        for burst in &bursts {
            self.confetti.spawn(burst);
        }
        self.confetti.update();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.confetti.resize(width, height);
    }

    /// Fire the event behind `id` if the stage offers it.
    pub fn activate(&mut self, id: ButtonId) -> Outcome {
        if !self.buttons_for_stage().contains(&id) {
            return Outcome::Ignored;
        }
        if id == ButtonId::Continue && self.stage() == Stage::Journey && !self.journey_at_end() {
            // The button sits below the story; bring it into view first
            self.journey_scroll = self.journey_max_scroll;
            return Outcome::Ignored;
        }

        let outcome = self.session.apply(id.event());
        if let Outcome::Moved { .. } = outcome {
            self.on_stage_changed();
        }
        outcome
    }

    fn on_stage_changed(&mut self) {
        self.focus = 0;
        self.transition = TRANSITION_FRAMES;
        self.stage_entered = self.now;
        self.journey_scroll = 0;
        self.buttons.clear();
        self.hovering_no = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return AppAction::Quit;
        }

        match self.session.stage() {
            Stage::Identity => match key.code {
                KeyCode::Char('y') => {
                    self.activate(ButtonId::IdentityYes);
                }
                KeyCode::Char('n') => {
                    self.activate(ButtonId::IdentityNo);
                }
                _ => self.handle_focus_key(key),
            },
            Stage::Welcome => {
                if is_confirm(key.code) {
                    self.activate(ButtonId::Continue);
                }
            }
            Stage::Reasons => {
                if is_confirm(key.code) || key.code == KeyCode::Right {
                    self.activate(ButtonId::ReasonCard);
                }
            }
            Stage::Journey => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll_journey(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_journey(1),
                KeyCode::PageUp => self.scroll_journey(-PAGE_ROWS),
                KeyCode::PageDown => self.scroll_journey(PAGE_ROWS),
                KeyCode::Home => self.journey_scroll = 0,
                KeyCode::End => self.journey_scroll = self.journey_max_scroll,
                code if is_confirm(code) => {
                    self.activate(ButtonId::Continue);
                }
                _ => {}
            },
            Stage::Letter => match key.code {
                KeyCode::Char('o') => {
                    self.activate(ButtonId::Envelope);
                }
                code if is_confirm(code) => {
                    if let Some(id) = self.focused_button() {
                        self.activate(id);
                    }
                }
                _ => {}
            },
            Stage::Question => match key.code {
                KeyCode::Char('y') => {
                    self.activate(ButtonId::ProposalYes);
                }
                KeyCode::Char('n') => {
                    self.activate(ButtonId::ProposalNo);
                }
                _ => self.handle_focus_key(key),
            },
            Stage::Denied | Stage::Success => {}
        }
        AppAction::Continue
    }

    /// Focus movement and activation for stages with two buttons.
    fn handle_focus_key(&mut self, key: KeyEvent) {
        let count = self.buttons_for_stage().len();
        if count == 0 {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => {
                self.set_focus((self.focus + 1) % count);
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => {
                self.set_focus((self.focus + count - 1) % count);
            }
            code if is_confirm(code) => {
                if let Some(id) = self.focused_button() {
                    self.activate(id);
                }
            }
            _ => {}
        }
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
        // Keyboard focus is the terminal's closest thing to hovering
        if self.hover_dodge && self.focused_button() == Some(ButtonId::ProposalNo) {
            self.session.dodge_proposal();
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.button_at(col, row) {
                    if let Some(i) = self.buttons_for_stage().iter().position(|&b| b == id) {
                        self.focus = i;
                    }
                    self.activate(id);
                }
            }
            MouseEventKind::Moved => {
                let over_no = self.button_at(col, row) == Some(ButtonId::ProposalNo);
                if over_no && !self.hovering_no && self.hover_dodge {
                    self.session.dodge_proposal();
                }
                self.hovering_no = over_no;
            }
            MouseEventKind::ScrollDown if self.stage() == Stage::Journey => self.scroll_journey(1),
            MouseEventKind::ScrollUp if self.stage() == Stage::Journey => self.scroll_journey(-1),
            _ => {}
        }
    }

    fn button_at(&self, col: u16, row: u16) -> Option<ButtonId> {
        self.buttons
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(col, row))
            .map(|(id, _)| *id)
    }

    pub fn scroll_journey(&mut self, delta: i32) {
        let next = (self.journey_scroll as i32 + delta).clamp(0, self.journey_max_scroll as i32);
        self.journey_scroll = next as u16;
    }

    pub fn journey_at_end(&self) -> bool {
        self.journey_scroll >= self.journey_max_scroll
    }

    /// Mark a journey entry as seen; the first time starts its fade-in.
    pub fn reveal_journey_entry(&mut self, index: usize) {
        if let Some(slot) = self.journey_reveals.get_mut(index) {
            if slot.is_none() {
                *slot = Some(self.frame);
            }
        }
    }

    /// 0.0 when the stage just appeared, 1.0 once the fade-in is over.
    pub fn fade_in(&self) -> f32 {
        1.0 - self.transition as f32 / TRANSITION_FRAMES as f32
    }

    /// The dodge offset in cells.
    pub fn dodge_cells(&self) -> (i16, i16) {
        let (x, y) = self
            .session
            .dodge_offset()
            .scaled(DODGE_CELLS_X, DODGE_CELLS_Y);
        (x.round() as i16, y.round() as i16)
    }

    pub fn seconds(&self) -> f32 {
        self.now.as_secs_f32()
    }

    pub fn seconds_in_stage(&self) -> f32 {
        self.now.saturating_sub(self.stage_entered).as_secs_f32()
    }
}

fn is_confirm(code: KeyCode) -> bool {
    matches!(code, KeyCode::Enter | KeyCode::Char(' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn app() -> App {
        App::new(Config {
            seed: Some(1),
            heart_count: 0,
            ..Config::default()
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_at_question() -> App {
        let mut app = app();
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Enter);
        for _ in 0..11 {
            press(&mut app, KeyCode::Enter);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Question);
        app
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        let quit = |app: &mut App, code| matches!(app.handle_key(key(code)), AppAction::Quit);
        assert!(quit(&mut app, KeyCode::Char('q')));
        assert!(quit(&mut app, KeyCode::Esc));
        assert!(!quit(&mut app, KeyCode::Enter));
    }

    #[test]
    fn test_buttons_only_offer_legal_events() {
        let mut app = app();
        let script = [KeyCode::Char('y'), KeyCode::Enter]
            .into_iter()
            .chain(std::iter::repeat(KeyCode::Enter).take(14))
            .chain([KeyCode::Char('n'), KeyCode::Char('y')]);
        for code in script {
            let offered = app.session.offered_events();
            for id in app.buttons_for_stage() {
                assert!(offered.contains(&id.event()), "{:?} in {}", id, app.stage());
            }
            assert_eq!(app.buttons_for_stage().len(), offered.len());
            press(&mut app, code);
        }
        assert_eq!(app.stage(), Stage::Success);
    }

    #[test]
    fn test_identity_focus_and_activate() {
        let mut app = app();
        assert_eq!(app.focused_button(), Some(ButtonId::IdentityYes));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_button(), Some(ButtonId::IdentityNo));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Denied);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Denied);
    }

    #[test]
    fn test_stage_change_resets_focus_and_fades() {
        let mut app = app();
        app.tick_at(Duration::from_millis(500));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.stage(), Stage::Welcome);
        assert_eq!(app.focus, 0);
        assert_eq!(app.transition, TRANSITION_FRAMES);
        assert_eq!(app.fade_in(), 0.0);
        assert_eq!(app.stage_entered, Duration::from_millis(500));
        for i in 1..=TRANSITION_FRAMES as u64 {
            app.tick_at(Duration::from_millis(500 + i * 33));
        }
        assert_eq!(app.fade_in(), 1.0);
    }

    #[test]
    fn test_journey_continue_needs_scroll() {
        let mut app = app();
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Enter);
        for _ in 0..11 {
            press(&mut app, KeyCode::Char(' '));
        }
        assert_eq!(app.stage(), Stage::Journey);

        app.journey_max_scroll = 20;
        press(&mut app, KeyCode::Down);
        assert_eq!(app.journey_scroll, 1);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.journey_scroll, 0);

        // First Enter scrolls to the button, second one follows it
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Journey);
        assert!(app.journey_at_end());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Letter);
        assert_eq!(app.journey_scroll, 0);
    }

    #[test]
    fn test_letter_opens_before_continue() {
        let mut app = app();
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Enter);
        for _ in 0..12 {
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.stage(), Stage::Letter);
        assert_eq!(app.buttons_for_stage(), vec![ButtonId::Envelope]);
        assert_eq!(app.activate(ButtonId::Continue), Outcome::Ignored);

        press(&mut app, KeyCode::Char('o'));
        assert!(app.session.is_letter_open());
        assert_eq!(app.stage(), Stage::Letter);

        // Pressing it again must not skip the letter
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.stage(), Stage::Letter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Question);
    }

    #[test]
    fn test_focus_on_no_dodges() {
        let mut app = app_at_question();
        assert_eq!(app.dodge_cells(), (0, 0));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_button(), Some(ButtonId::ProposalNo));
        assert_ne!(
            app.session.dodge_offset(),
            valentine_core::DodgeOffset::ORIGIN
        );

        let (x, y) = app.dodge_cells();
        assert!(x.abs() <= DODGE_CELLS_X as i16);
        assert!(y.abs() <= DODGE_CELLS_Y as i16);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stage(), Stage::Question);
    }

    #[test]
    fn test_focus_dodge_can_be_disabled() {
        let mut app = app_at_question();
        app.hover_dodge = false;
        press(&mut app, KeyCode::Tab);
        assert_eq!(
            app.session.dodge_offset(),
            valentine_core::DodgeOffset::ORIGIN
        );
        press(&mut app, KeyCode::Char('n'));
        assert_ne!(
            app.session.dodge_offset(),
            valentine_core::DodgeOffset::ORIGIN
        );
    }

    #[test]
    fn test_mouse_click_and_hover() {
        let mut app = app_at_question();
        let yes = Rect {
            x: 10,
            y: 10,
            width: 12,
            height: 1,
        };
        let no = Rect {
            x: 10,
            y: 12,
            width: 8,
            height: 1,
        };
        app.buttons = vec![(ButtonId::ProposalYes, yes), (ButtonId::ProposalNo, no)];

        app.handle_mouse(mouse(MouseEventKind::Moved, 11, 12));
        let first = app.session.dodge_offset();
        assert_ne!(first, valentine_core::DodgeOffset::ORIGIN);

        // Staying over the button is not a new hover
        app.handle_mouse(mouse(MouseEventKind::Moved, 12, 12));
        assert_eq!(app.session.dodge_offset(), first);

        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0));
        app.handle_mouse(mouse(MouseEventKind::Moved, 11, 12));
        assert_ne!(app.session.dodge_offset(), first);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 15, 10));
        assert_eq!(app.stage(), Stage::Success);
    }

    #[test]
    fn test_yes_wins_over_no_in_shared_cells() {
        let mut app = app_at_question();
        let yes = Rect {
            x: 10,
            y: 10,
            width: 12,
            height: 1,
        };
        let no = Rect {
            x: 16,
            y: 10,
            width: 8,
            height: 1,
        };
        // Render order: "no" first, "yes" on top
        app.buttons = vec![(ButtonId::ProposalNo, no), (ButtonId::ProposalYes, yes)];

        app.handle_mouse(mouse(MouseEventKind::Moved, 18, 10));
        assert_eq!(app.session.dodge_offset(), valentine_core::DodgeOffset::ORIGIN);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 18, 10));
        assert_eq!(app.stage(), Stage::Success);
    }

    #[test]
    fn test_celebration_fires_once_across_resizes() {
        let mut app = app_at_question();
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.stage(), Stage::Success);

        let mut t = Duration::from_secs(10);
        app.tick_at(t);
        assert!(!app.confetti.is_empty());
        while app.session.celebration().is_running() {
            t += Duration::from_millis(33);
            app.resize(100, 30);
            app.tick_at(t);
        }
        assert_eq!(app.session.celebration().fire_count(), 1);
        assert!(t >= Duration::from_secs(13));

        // Particles settle and nothing new is launched
        for _ in 0..200 {
            t += Duration::from_millis(33);
            app.resize(80, 24);
            app.tick_at(t);
        }
        assert!(app.confetti.is_empty());
        assert_eq!(app.session.celebration().fire_count(), 1);
    }

    #[test]
    fn test_journey_reveal_once() {
        let mut app = app();
        app.frame = 5;
        app.reveal_journey_entry(0);
        app.frame = 9;
        app.reveal_journey_entry(0);
        assert_eq!(app.journey_reveals[0], Some(5));
        app.reveal_journey_entry(99);
    }

    #[test]
    fn test_tick_rate() {
        let mut app = app();
        assert_eq!(app.get_tick_rate(), Duration::from_millis(33));
        for i in 0..TRANSITION_FRAMES as u64 {
            app.tick_at(Duration::from_millis(i));
        }
        assert_eq!(app.get_tick_rate(), Duration::from_millis(100));
    }
}
