mod analysis;
mod answers;
pub mod checkpoint;
mod config;
mod errors;
mod events;
mod generation;
mod instruction;
mod journey;
pub mod memory_pile;
mod opentelemetry;
pub mod prompts;
mod question;
mod report;
pub mod theme;
mod transcript;
pub mod unlock;

pub use analysis::{letter_paragraphs, strip_code_fences, AnalysisResult, Keyword, Portrait};
pub use answers::AnswerMap;
pub use config::{GenerationConfig, ReviewFailurePolicy};
pub use errors::{AnalysisError, GenerationError, JourneyError};
pub use events::{JourneyEvent, JourneyObserver, View};
pub use generation::GenerationClient;
pub use instruction::InstructionParam;
pub use journey::{ChatTicket, InspirationTicket, Journey, ReviewTicket, SubmitOutcome};
pub use question::{Question, QuestionSequence, DEFAULT_PLACEHOLDER};
pub use report::{ReportEntry, ResultsReport};
pub use theme::{ParticleKind, Theme, VisualStyle};
pub use transcript::{ChatMemory, ChatTranscript, ChatTurn, Speaker, CHAT_GREETING};
