use std::time::Duration;

/// A checkpoint fires after every this many answers.
pub const CHECKPOINT_INTERVAL: usize = 5;
/// How long a checkpoint stays on screen.
pub const CHECKPOINT_DISPLAY: Duration = Duration::from_secs(3);

/// The encouragement shown after submitting the answer at `index` in a
/// sequence of `total` questions, if any. Never fires on the final
/// submission.
#[must_use]
pub fn checkpoint_for(index: usize, total: usize) -> Option<String> {
    let count = index + 1;
    if count % CHECKPOINT_INTERVAL != 0 || count >= total {
        return None;
    }
    Some(checkpoint_message(count))
}

#[must_use]
pub fn checkpoint_message(count: usize) -> String {
    match count {
        5 => "正在把你的烟火气装入信封... (Collecting your sparks...)".to_string(),
        10 => "听起来，那是很温柔的一年。 (Sounds like a gentle year.)".to_string(),
        15 => "那些情绪的碎片，都已妥善安放。 (Fragments safely stored.)".to_string(),
        n => format!("已封存 {n} 段记忆 ({n} memories sealed.)"),
    }
}

/// A checkpoint currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointToast {
    message: String,
    remaining: Duration,
}

impl CheckpointToast {
    #[must_use]
    pub fn new(message: String) -> Self {
        Self {
            message,
            remaining: CHECKPOINT_DISPLAY,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Counts down; true once the toast has expired.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}
