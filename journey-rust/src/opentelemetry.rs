use opentelemetry::trace::Status;
use std::{error::Error, future::Future};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationOperation {
    Inspiration,
    Review,
    Chat,
}

impl GenerationOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inspiration => "inspiration",
            Self::Review => "review",
            Self::Chat => "chat",
        }
    }
}

/// Span around one Generation Client operation. Records whether the
/// caller got model output or fallback content.
pub struct GenerationSpan {
    span: Span,
    fallback: bool,
    ended: bool,
}

impl GenerationSpan {
    pub fn new(operation: GenerationOperation, offline: bool) -> Self {
        let span = info_span!("capsule_journey.generation");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("capsule_journey.operation", operation.as_str());
        span.set_attribute("capsule_journey.offline", offline);

        Self {
            span,
            fallback: offline,
            ended: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_error(&mut self, error: &(dyn Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_fallback(&mut self) {
        self.fallback = true;
    }

    pub fn on_end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.span
            .set_attribute("capsule_journey.fallback", self.fallback);
    }
}

impl Drop for GenerationSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Runs `future` inside a generation span, recording its error if any.
pub async fn trace_generation<T, E, Fut>(
    operation: GenerationOperation,
    offline: bool,
    future: Fut,
) -> (Result<T, E>, GenerationSpan)
where
    E: Error + 'static,
    Fut: Future<Output = Result<T, E>>,
{
    let mut span = GenerationSpan::new(operation, offline);
    let result = future.instrument(span.span()).await;

    if let Err(error) = &result {
        span.on_error(error);
    }

    (result, span)
}
