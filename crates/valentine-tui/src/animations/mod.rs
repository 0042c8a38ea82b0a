pub mod confetti;
pub mod particles;

pub use confetti::ConfettiField;
