mod client_utils;
mod errors;
mod language_model;
pub mod openai;
mod opentelemetry;
pub mod testing;
mod types;
mod types_ext;

pub use errors::*;
pub use language_model::LanguageModel;
pub use types::*;
