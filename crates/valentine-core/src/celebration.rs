use std::time::Duration;

/// How long the celebration keeps emitting bursts.
pub const CELEBRATION_DURATION: Duration = Duration::from_millis(3000);

/// Particles per burst
pub const BURST_PARTICLES: usize = 5;

/// Cone width of a burst in degrees
pub const BURST_SPREAD: f32 = 55.0;

/// Confetti colors as RGB: pink, lavender, rose.
pub const CONFETTI_PALETTE: [(u8, u8, u8); 3] = [(249, 168, 212), (216, 180, 254), (252, 165, 165)];

/// One emission of confetti from a horizontal edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    /// Horizontal origin as a fraction of the viewport width (0 = left, 1 = right).
    pub origin_x: f32,
    /// Launch direction in degrees, 90 pointing straight up.
    pub angle: f32,
    pub spread: f32,
    pub particle_count: usize,
    pub palette: &'static [(u8, u8, u8)],
}

impl Burst {
    fn left() -> Self {
        Self {
            origin_x: 0.0,
            angle: 60.0,
            spread: BURST_SPREAD,
            particle_count: BURST_PARTICLES,
            palette: &CONFETTI_PALETTE,
        }
    }

    fn right() -> Self {
        Self {
            origin_x: 1.0,
            angle: 120.0,
            spread: BURST_SPREAD,
            particle_count: BURST_PARTICLES,
            palette: &CONFETTI_PALETTE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationState {
    Idle,
    /// Requested, waiting for the first tick to learn the time.
    Armed,
    Running { started: Duration, deadline: Duration },
    Finished,
}

/// Fire-once confetti schedule.
///
/// `arm` is idempotent and the schedule never goes back to `Idle`, so a
/// re-render of the final screen cannot start a second celebration. Time
/// is whatever monotonic clock the caller ticks with.
#[derive(Debug, Clone)]
pub struct Celebration {
    state: CelebrationState,
    duration: Duration,
    fire_count: u32,
    bursts_emitted: usize,
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

impl Celebration {
    pub fn new() -> Self {
        Self::with_duration(CELEBRATION_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            state: CelebrationState::Idle,
            duration,
            fire_count: 0,
            bursts_emitted: 0,
        }
    }

    /// Request the celebration. Returns false if it was already requested.
    pub fn arm(&mut self) -> bool {
        if self.state != CelebrationState::Idle {
            return false;
        }
        self.state = CelebrationState::Armed;
        true
    }

    /// Advance the schedule to `now` and return the bursts to spawn this frame.
    pub fn tick(&mut self, now: Duration) -> Vec<Burst> {
        let deadline = match self.state {
            CelebrationState::Idle | CelebrationState::Finished => return Vec::new(),
            CelebrationState::Armed => {
                let deadline = now + self.duration;
                self.state = CelebrationState::Running {
                    started: now,
                    deadline,
                };
                self.fire_count += 1;
                log::info!("celebration started, runs until {:?}", deadline);
                deadline
            }
            CelebrationState::Running { deadline, .. } => deadline,
        };

        let bursts = vec![Burst::left(), Burst::right()];
        self.bursts_emitted += bursts.len();

        // Emit first, then check the deadline, so the last frame still fires
        if now >= deadline {
            self.state = CelebrationState::Finished;
            log::info!("celebration finished after {} bursts", self.bursts_emitted);
        }
        bursts
    }

    pub fn state(&self) -> CelebrationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            CelebrationState::Armed | CelebrationState::Running { .. }
        )
    }

    pub fn is_finished(&self) -> bool {
        self.state == CelebrationState::Finished
    }

    /// Number of times the celebration has started; never exceeds one.
    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }

    pub fn bursts_emitted(&self) -> usize {
        self.bursts_emitted
    }

    /// Fraction of the run completed at `now`, 0.0 before start and 1.0 after.
    pub fn progress(&self, now: Duration) -> f32 {
        match self.state {
            CelebrationState::Idle | CelebrationState::Armed => 0.0,
            CelebrationState::Finished => 1.0,
            CelebrationState::Running { started, deadline } => {
                let total = (deadline - started).as_secs_f32();
                if total <= 0.0 {
                    return 1.0;
                }
                (now.saturating_sub(started).as_secs_f32() / total).min(1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_idle_emits_nothing() {
        let mut c = Celebration::new();
        assert!(c.tick(ms(0)).is_empty());
        assert_eq!(c.fire_count(), 0);
        assert_eq!(c.state(), CelebrationState::Idle);
    }

    #[test]
    fn test_arm_is_idempotent() {
        let mut c = Celebration::new();
        assert!(c.arm());
        assert!(!c.arm());
        c.tick(ms(100));
        assert!(!c.arm());
        assert_eq!(c.fire_count(), 1);
    }

    #[test]
    fn test_runs_until_deadline_then_stops() {
        let mut c = Celebration::new();
        c.arm();

        let start = ms(1_000);
        let first = c.tick(start);
        assert_eq!(first.len(), 2);
        assert_eq!(
            c.state(),
            CelebrationState::Running {
                started: start,
                deadline: start + CELEBRATION_DURATION
            }
        );

        // One frame every 16ms until the deadline
        let mut t = start;
        while t < start + CELEBRATION_DURATION {
            t += ms(16);
            assert_eq!(c.tick(t).len(), 2);
        }
        assert!(c.is_finished());

        // Nothing after it finished, however long we keep ticking
        for extra in 1..100 {
            assert!(c.tick(t + ms(extra * 16)).is_empty());
        }
        assert_eq!(c.fire_count(), 1);
    }

    #[test]
    fn test_deadline_independent_of_frame_rate() {
        let mut slow = Celebration::new();
        let mut fast = Celebration::new();
        slow.arm();
        fast.arm();

        let mut t = ms(0);
        while !slow.is_finished() {
            slow.tick(t);
            t += ms(100);
        }
        let slow_end = t;

        let mut t = ms(0);
        while !fast.is_finished() {
            fast.tick(t);
            t += ms(10);
        }
        let fast_end = t;

        // Both stop within one frame of the 3 second mark
        assert!(slow_end >= ms(3_000) && slow_end <= ms(3_200));
        assert!(fast_end >= ms(3_000) && fast_end <= ms(3_020));
        assert!(fast.bursts_emitted() > slow.bursts_emitted());
    }

    #[test]
    fn test_bursts_come_from_both_edges() {
        let mut c = Celebration::new();
        c.arm();
        let bursts = c.tick(ms(0));
        assert_eq!(bursts[0].origin_x, 0.0);
        assert_eq!(bursts[0].angle, 60.0);
        assert_eq!(bursts[1].origin_x, 1.0);
        assert_eq!(bursts[1].angle, 120.0);
        for b in &bursts {
            assert_eq!(b.particle_count, 5);
            assert_eq!(b.spread, 55.0);
            assert_eq!(b.palette.len(), 3);
        }
    }

    #[test]
    fn test_progress() {
        let mut c = Celebration::new();
        assert_eq!(c.progress(ms(500)), 0.0);
        c.arm();
        c.tick(ms(0));
        assert!((c.progress(ms(1_500)) - 0.5).abs() < 1e-3);
        c.tick(ms(3_000));
        assert_eq!(c.progress(ms(3_000)), 1.0);
    }
}
