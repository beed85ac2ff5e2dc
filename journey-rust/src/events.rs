use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen the journey is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Intro,
    ThemeSelect,
    UnlockGesture,
    Questioning,
    Generating,
    Results,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::ThemeSelect => "themeSelect",
            Self::UnlockGesture => "unlockGesture",
            Self::Questioning => "questioning",
            Self::Generating => "generating",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something observable happened to a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEvent {
    ViewChanged { from: View, to: View },
    AnswerRecorded { question_id: String },
    Checkpoint { message: String },
    CheckpointDismissed,
    InspirationReady,
    /// Review synthesis failed and the journey went back to the questions.
    ReviewFailed { message: String },
    ChatUpdated,
    Reset,
}

/// Receives journey events synchronously, in the order they happen.
pub trait JourneyObserver: Send + Sync {
    fn on_event(&self, event: &JourneyEvent);
}

impl<F> JourneyObserver for F
where
    F: Fn(&JourneyEvent) + Send + Sync,
{
    fn on_event(&self, event: &JourneyEvent) {
        self(event);
    }
}
