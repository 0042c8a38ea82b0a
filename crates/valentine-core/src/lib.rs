//! Core of the Valentine greeting.
//!
//! The greeting walks one person through a fixed series of screens. This
//! crate owns everything that is not drawing: the [`Session`] stage machine
//! with its interaction state, the personalized [`Content`], the one-shot
//! [`Celebration`] schedule and the ambient [`HeartField`]. Front ends map
//! their input to [`Event`]s and render whatever [`Stage`] is current.

pub mod celebration;
pub mod content;
pub mod dodge;
pub mod hearts;
pub mod rng;
pub mod session;
pub mod stage;

pub use celebration::{Burst, Celebration, CelebrationState, CELEBRATION_DURATION};
pub use content::{labels, Content, ContentError, JourneyEntry, JourneyIcon, Letter};
pub use dodge::{DodgeOffset, DODGE_RANGE};
pub use hearts::{Heart, HeartField, HeartFrame, DEFAULT_HEART_COUNT, RISE_DISTANCE};
pub use rng::SimpleRng;
pub use session::Session;
pub use stage::{Event, Outcome, Stage};
