use std::time::Duration;

/// Percent gained per second while held (1.5 % every 20 ms).
pub const FILL_RATE: f32 = 75.0;
/// Percent lost per second once released (5 % every 10 ms).
pub const DECAY_RATE: f32 = 500.0;
/// How long the opened capsule lingers before the questions appear.
pub const OPEN_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Released,
    Pressed,
    /// Progress reached 100. Latched until reset.
    Completed,
    /// The open delay has elapsed.
    Open,
}

/// Press-and-hold gesture: progress fills while pressed and drains quickly
/// once released. Driven entirely by [`UnlockGesture::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockGesture {
    progress: f32,
    phase: GesturePhase,
    since_complete: Duration,
}

impl UnlockGesture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self) {
        if self.phase == GesturePhase::Released {
            self.phase = GesturePhase::Pressed;
        }
    }

    pub fn release(&mut self) {
        if self.phase == GesturePhase::Pressed {
            self.phase = GesturePhase::Released;
        }
    }

    /// Advances the gesture by `dt`. Returns true exactly once, on the tick
    /// where the open delay runs out.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let secs = dt.as_secs_f32();
        match self.phase {
            GesturePhase::Pressed => {
                self.progress = (self.progress + FILL_RATE * secs).min(100.0);
                if self.progress >= 100.0 {
                    self.phase = GesturePhase::Completed;
                    self.since_complete = Duration::ZERO;
                }
                false
            }
            GesturePhase::Released => {
                self.progress = (self.progress - DECAY_RATE * secs).max(0.0);
                false
            }
            GesturePhase::Completed => {
                self.since_complete += dt;
                if self.since_complete >= OPEN_DELAY {
                    self.phase = GesturePhase::Open;
                    return true;
                }
                false
            }
            GesturePhase::Open => false,
        }
    }

    /// Progress in percent, within `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, GesturePhase::Completed | GesturePhase::Open)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase == GesturePhase::Open
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(20);

    fn hold(gesture: &mut UnlockGesture, steps: u32) -> bool {
        (0..steps).fold(false, |opened, _| gesture.tick(STEP) || opened)
    }

    #[test]
    fn fills_while_pressed_and_drains_when_released() {
        let mut gesture = UnlockGesture::new();
        gesture.press();
        hold(&mut gesture, 10);
        assert!((gesture.progress() - 15.0).abs() < 0.01);

        gesture.release();
        gesture.tick(Duration::from_millis(10));
        assert!((gesture.progress() - 10.0).abs() < 0.01);

        gesture.tick(Duration::from_secs(1));
        assert!(gesture.progress().abs() < f32::EPSILON);
    }

    #[test]
    fn completes_then_opens_after_delay() {
        let mut gesture = UnlockGesture::new();
        gesture.press();
        // 100 / 1.5 rounds up to 67 steps of 20ms
        assert!(!hold(&mut gesture, 67));
        assert!(gesture.is_complete());
        assert!((gesture.progress() - 100.0).abs() < f32::EPSILON);

        gesture.release();
        assert!(!gesture.tick(Duration::from_millis(799)));
        assert!((gesture.progress() - 100.0).abs() < f32::EPSILON);
        assert!(gesture.tick(Duration::from_millis(1)));
        assert!(gesture.is_open());
        assert!(!gesture.tick(STEP));
    }

    #[test]
    fn press_after_completion_is_ignored() {
        let mut gesture = UnlockGesture::new();
        gesture.press();
        hold(&mut gesture, 100);
        gesture.press();
        assert_eq!(gesture.phase(), GesturePhase::Completed);

        gesture.reset();
        assert_eq!(gesture, UnlockGesture::new());
    }
}
