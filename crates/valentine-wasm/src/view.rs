//! Interaction state for the canvas UI.
//!
//! Layout, hit-testing and input handling live here, away from the DOM, so
//! the whole flow can be driven and checked without a browser. The renderer
//! reads the same layout that clicks are tested against.

use crate::animations::Confetti;
use serde::Serialize;
use std::time::Duration;
use valentine_core::{
    Content, DodgeOffset, Event, HeartField, Outcome, Session, SimpleRng, Stage,
    DEFAULT_HEART_COUNT,
};

/// Stage fade-in, in ms
pub const FADE_MS: f64 = 400.0;
/// Top of the journey scroll area
pub const JOURNEY_TOP: f64 = 110.0;
pub const JOURNEY_ENTRY_HEIGHT: f64 = 170.0;
/// Closing line and button below the last entry
pub const JOURNEY_TAIL_HEIGHT: f64 = 200.0;
const SCROLL_STEP: f64 = 60.0;
const PAGE_STEP: f64 = 400.0;

/// Something on screen the user can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonId {
    IdentityYes,
    IdentityNo,
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

/// Axis-aligned rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Read-only view of the state, for debugging from the page
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub stage: Stage,
    pub reason_index: usize,
    pub reason_count: usize,
    pub letter_open: bool,
    pub dodge: DodgeOffset,
    pub focus: Option<ButtonId>,
    pub journey_scroll: f64,
    pub celebration_fired: u32,
    pub celebration_running: bool,
    pub buttons: Vec<(ButtonId, Bounds)>,
}

pub struct ViewState {
    session: Session,
    hearts: HeartField,
    confetti: Confetti,
    width: f64,
    height: f64,
    focus: usize,
    hover_dodge: bool,
    hovering_no: bool,
    journey_scroll: f64,
    /// Time each journey entry first came into view
    journey_reveals: Vec<Option<f64>>,
    origin_ms: Option<f64>,
    last_tick_ms: Option<f64>,
    now_ms: f64,
    stage_entered_ms: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Content::default(), None)
    }
}

impl ViewState {
    pub fn new(content: Content, seed: Option<u64>) -> Self {
        let (session, hearts, confetti) = match seed {
            Some(seed) => (
                Session::with_seed(content, seed),
                HeartField::generate(&mut SimpleRng::with_seed(seed), DEFAULT_HEART_COUNT),
                Confetti::with_seed(seed),
            ),
            None => (
                Session::new(content),
                HeartField::generate(&mut SimpleRng::new(), DEFAULT_HEART_COUNT),
                Confetti::new(),
            ),
        };
        let journey_len = session.content().journey.len();
        Self {
            session,
            hearts,
            confetti,
            width: 1000.0,
            height: 700.0,
            focus: 0,
            hover_dodge: true,
            hovering_no: false,
            journey_scroll: 0.0,
            journey_reveals: vec![None; journey_len],
            origin_ms: None,
            last_tick_ms: None,
            now_ms: 0.0,
            stage_entered_ms: 0.0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    pub fn hearts(&self) -> &HeartField {
        &self.hearts
    }

    pub fn confetti(&self) -> &Confetti {
        &self.confetti
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.journey_scroll = self.journey_scroll.min(self.journey_max_scroll());
    }

    /// Touch screens have no hover; the page can turn it off.
    pub fn set_hover_dodge(&mut self, enabled: bool) {
        self.hover_dodge = enabled;
    }

    /// Seconds since the first tick.
    pub fn elapsed_secs(&self) -> f64 {
        match self.origin_ms {
            Some(origin) => (self.now_ms - origin) / 1000.0,
            None => 0.0,
        }
    }

    pub fn seconds_in_stage(&self) -> f64 {
        (self.now_ms - self.stage_entered_ms).max(0.0) / 1000.0
    }

    /// 0.0 right after a stage change, 1.0 once faded in.
    pub fn fade_in(&self) -> f64 {
        ((self.now_ms - self.stage_entered_ms) / FADE_MS).clamp(0.0, 1.0)
    }

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

    /// The frosted card behind the stage's text, if it has one.
    pub fn card(&self) -> Option<Bounds> {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let fit = |w: f64, h: f64| {
            Bounds::centered(cx, cy, w.min(self.width - 32.0), h.min(self.height - 32.0))
        };
        match self.session.stage() {
            Stage::Identity | Stage::Success => Some(fit(400.0, 320.0)),
            Stage::Denied => Some(fit(400.0, 240.0)),
            Stage::Welcome => Some(fit(460.0, 380.0)),
            Stage::Reasons => Some(fit(340.0, 240.0)),
            Stage::Question => Some(fit(440.0, 340.0)),
            Stage::Letter => {
                if self.session.is_letter_open() {
                    Some(fit(560.0, 600.0))
                } else {
                    Some(fit(320.0, 210.0))
                }
            }
            Stage::Journey => None,
        }
    }

    /// Buttons currently on screen. A journey button scrolled out of view is left out.
    pub fn layout(&self) -> Vec<(ButtonId, Bounds)> {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let card = self.card();
        match self.session.stage() {
            Stage::Identity => vec![
                (ButtonId::IdentityYes, Bounds::centered(cx - 80.0, cy + 90.0, 140.0, 48.0)),
                (ButtonId::IdentityNo, Bounds::centered(cx + 80.0, cy + 90.0, 120.0, 48.0)),
            ],
            Stage::Welcome => vec![(
                ButtonId::Continue,
                Bounds::centered(cx, cy + 130.0, 180.0, 52.0),
            )],
            Stage::Reasons => card.map(|c| (ButtonId::ReasonCard, c)).into_iter().collect(),
            Stage::Journey => {
                let button = Bounds::centered(cx, self.journey_button_y(), 220.0, 52.0);
                if button.y >= JOURNEY_TOP && button.y + button.h <= self.height {
                    vec![(ButtonId::Continue, button)]
                } else {
                    Vec::new()
                }
            }
            Stage::Letter => match card {
                Some(c) if self.session.is_letter_open() => vec![(
                    ButtonId::Continue,
                    Bounds::centered(cx, c.y + c.h - 50.0, 240.0, 48.0),
                )],
                Some(c) => vec![(ButtonId::Envelope, c)],
                None => Vec::new(),
            },
            Stage::Question => {
                // "yes" last, so it is drawn over a dodged "no" and wins its clicks
                let dodge = self.session.dodge_offset();
                vec![
                    (
                        ButtonId::ProposalNo,
                        Bounds::centered(
                            cx + 80.0 + dodge.x as f64,
                            cy + 70.0 + dodge.y as f64,
                            110.0,
                            56.0,
                        ),
                    ),
                    (ButtonId::ProposalYes, Bounds::centered(cx - 80.0, cy + 70.0, 150.0, 56.0)),
                ]
            }
            Stage::Denied | Stage::Success => Vec::new(),
        }
    }

    /// Topmost button under the point, i.e. the last one drawn.
    pub fn button_at(&self, x: f64, y: f64) -> Option<ButtonId> {
        self.layout()
            .into_iter()
            .rev()
            .find(|(_, b)| b.contains(x, y))
            .map(|(id, _)| id)
    }

    // Journey scrolling

    pub fn journey_scroll(&self) -> f64 {
        self.journey_scroll
    }

    pub fn journey_content_height(&self) -> f64 {
        self.session.content().journey.len() as f64 * JOURNEY_ENTRY_HEIGHT + JOURNEY_TAIL_HEIGHT
    }

    pub fn journey_max_scroll(&self) -> f64 {
        (self.journey_content_height() - (self.height - JOURNEY_TOP)).max(0.0)
    }

    pub fn journey_at_end(&self) -> bool {
        self.journey_scroll >= self.journey_max_scroll()
    }

    /// Top of entry `index` on screen.
    pub fn journey_entry_y(&self, index: usize) -> f64 {
        JOURNEY_TOP + index as f64 * JOURNEY_ENTRY_HEIGHT - self.journey_scroll
    }

    fn journey_button_y(&self) -> f64 {
        self.journey_entry_y(self.session.content().journey.len()) + JOURNEY_TAIL_HEIGHT - 50.0
    }

    /// Reveal progress of entry `index`, 0.0 until it has been seen.
    pub fn journey_reveal(&self, index: usize) -> f64 {
        match self.journey_reveals.get(index).copied().flatten() {
            Some(at) => ((self.now_ms - at) / FADE_MS).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn scroll_journey(&mut self, delta: f64) {
        self.journey_scroll = (self.journey_scroll + delta).clamp(0.0, self.journey_max_scroll());
        self.update_reveals();
    }

    fn update_reveals(&mut self) {
        if self.session.stage() != Stage::Journey {
            return;
        }
        for i in 0..self.journey_reveals.len() {
            let top = self.journey_entry_y(i);
            let visible = top < self.height - 40.0 && top + JOURNEY_ENTRY_HEIGHT > JOURNEY_TOP;
            if visible && self.journey_reveals[i].is_none() {
                self.journey_reveals[i] = Some(self.now_ms);
            }
        }
    }

    // Input

    /// Fire the event behind `id` if the stage offers it.
    pub fn activate(&mut self, id: ButtonId) -> Outcome {
        if !self.buttons_for_stage().contains(&id) {
            return Outcome::Ignored;
        }
        if id == ButtonId::Continue && self.stage() == Stage::Journey && !self.journey_at_end() {
            self.journey_scroll = self.journey_max_scroll();
            self.update_reveals();
            return Outcome::Ignored;
        }

        let outcome = self.session.apply(id.event());
        if let Outcome::Moved { .. } = outcome {
            self.focus = 0;
            self.stage_entered_ms = self.now_ms;
            self.journey_scroll = 0.0;
            self.hovering_no = false;
            self.update_reveals();
        }
        outcome
    }

    /// Handle a `KeyboardEvent.key` value. Returns true if the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.session.stage() {
            Stage::Identity | Stage::Question => {
                let (yes, no) = if self.stage() == Stage::Identity {
                    (ButtonId::IdentityYes, ButtonId::IdentityNo)
                } else {
                    (ButtonId::ProposalYes, ButtonId::ProposalNo)
                };
                match key {
                    "y" | "Y" => {
                        self.activate(yes);
                    }
                    "n" | "N" => {
                        self.activate(no);
                    }
                    "ArrowLeft" | "ArrowUp" => self.set_focus(0),
                    "ArrowRight" | "ArrowDown" => self.set_focus(1),
                    "Tab" => self.set_focus((self.focus + 1) % 2),
                    "Enter" | " " => {
                        if let Some(id) = self.focused_button() {
                            self.activate(id);
                        }
                    }
                    _ => return false,
                }
            }
            Stage::Welcome => match key {
                "Enter" | " " => {
                    self.activate(ButtonId::Continue);
                }
                _ => return false,
            },
            Stage::Reasons => match key {
                "Enter" | " " | "ArrowRight" => {
                    self.activate(ButtonId::ReasonCard);
                }
                _ => return false,
            },
            Stage::Journey => match key {
                "ArrowDown" | "j" => self.scroll_journey(SCROLL_STEP),
                "ArrowUp" | "k" => self.scroll_journey(-SCROLL_STEP),
                "PageDown" => self.scroll_journey(PAGE_STEP),
                "PageUp" => self.scroll_journey(-PAGE_STEP),
                "Home" => self.scroll_journey(-self.journey_scroll),
                "End" => self.scroll_journey(self.journey_max_scroll()),
                "Enter" | " " => {
                    self.activate(ButtonId::Continue);
                }
                _ => return false,
            },
            Stage::Letter => match key {
                "Enter" | " " => {
                    if let Some(id) = self.focused_button() {
                        self.activate(id);
                    }
                }
                "o" => {
                    self.activate(ButtonId::Envelope);
                }
                _ => return false,
            },
            Stage::Denied | Stage::Success => return false,
        }
        true
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
        if self.hover_dodge && self.focused_button() == Some(ButtonId::ProposalNo) {
            self.session.dodge_proposal();
        }
    }

    /// A click at logical coordinates. Returns true if it hit a button.
    pub fn handle_click(&mut self, x: f64, y: f64) -> bool {
        let Some(id) = self.button_at(x, y) else {
            return false;
        };
        if let Some(i) = self.buttons_for_stage().iter().position(|&b| b == id) {
            self.focus = i;
        }
        self.activate(id);
        true
    }

    /// Pointer movement; entering the "no" button makes it dodge. Returns true if it did.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let over_no = self.button_at(x, y) == Some(ButtonId::ProposalNo);
        let dodge = over_no && !self.hovering_no && self.hover_dodge;
        if dodge {
            self.session.dodge_proposal();
        }
        // The button has moved away, so the next move is a fresh approach
        self.hovering_no = over_no && !dodge;
        dodge
    }

    pub fn handle_wheel(&mut self, delta_y: f64) {
        if self.session.stage() == Stage::Journey {
            self.scroll_journey(delta_y);
        }
    }

    /// Advance to `now_ms` (a `requestAnimationFrame` timestamp).
    pub fn tick(&mut self, now_ms: f64) {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        if self.last_tick_ms.is_none() {
            self.stage_entered_ms = now_ms;
        }
        let dt = self
            .last_tick_ms
            .map(|last| ((now_ms - last) / 1000.0).clamp(0.0, 0.1))
            .unwrap_or(0.0);
        self.last_tick_ms = Some(now_ms);
        self.now_ms = now_ms;

        let since_start = Duration::from_secs_f64(((now_ms - origin) / 1000.0).max(0.0));
        let bursts = self.session.celebration_mut().tick(since_start);
        for burst in &bursts {
            self.confetti.spawn(burst, self.width, self.height);
        }
        self.confetti.update(dt, self.height);
        self.update_reveals();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stage: self.session.stage(),
            reason_index: self.session.reason_index(),
            reason_count: self.session.content().reason_count(),
            letter_open: self.session.is_letter_open(),
            dodge: self.session.dodge_offset(),
            focus: self.focused_button(),
            journey_scroll: self.journey_scroll,
            celebration_fired: self.session.celebration().fire_count(),
            celebration_running: self.session.celebration().is_running(),
            buttons: self.layout(),
        }
    }
}
