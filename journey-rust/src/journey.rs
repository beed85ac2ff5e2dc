use crate::{
    checkpoint::{checkpoint_for, CheckpointToast},
    memory_pile::MemoryPile,
    prompts::REVIEW_FAILED_ALERT,
    theme::NEUTRAL_CONTEXT,
    unlock::UnlockGesture,
    AnalysisResult, AnswerMap, ChatMemory, ChatTranscript, GenerationClient, GenerationError,
    JourneyError, JourneyEvent, JourneyObserver, Question, QuestionSequence, ResultsReport,
    ReviewFailurePolicy, Theme, View,
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

/// Pending review synthesis. Hand it to a [`GenerationClient`] and return
/// the outcome through [`Journey::complete_review`].
#[derive(Debug, Clone)]
pub struct ReviewTicket {
    epoch: u64,
    pub answers: AnswerMap,
    pub theme_context: String,
}

#[derive(Debug, Clone)]
pub struct InspirationTicket {
    epoch: u64,
    pub question_id: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct ChatTicket {
    epoch: u64,
    /// The conversation before `message` was sent.
    pub history: ChatTranscript,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Blank input. Nothing changed.
    Rejected,
    Advanced { checkpoint: Option<String> },
    /// That was the last question; the journey is now generating.
    Finished(ReviewTicket),
}

/// The whole application state for one user, from the intro screen to the
/// chat with their past year.
///
/// All operations are synchronous. Work that needs the backend is handed
/// out as a ticket and fed back in when it resolves; tickets issued before a
/// [`Journey::reset`] are ignored.
pub struct Journey {
    questions: QuestionSequence,
    view: View,
    theme: Option<Theme>,
    index: usize,
    answers: AnswerMap,
    analysis: Option<AnalysisResult>,
    transcript: ChatTranscript,
    gesture: UnlockGesture,
    checkpoint: Option<CheckpointToast>,
    pile: MemoryPile,
    inspiration: Option<String>,
    inspiration_pending: bool,
    chat_pending: bool,
    alert: Option<String>,
    epoch: u64,
    observers: Vec<Arc<dyn JourneyObserver>>,
}

impl Default for Journey {
    fn default() -> Self {
        Self::new(QuestionSequence::year_in_review())
    }
}

impl Journey {
    #[must_use]
    pub fn new(questions: QuestionSequence) -> Self {
        Self {
            questions,
            view: View::Intro,
            theme: None,
            index: 0,
            answers: AnswerMap::new(),
            analysis: None,
            transcript: ChatTranscript::default(),
            gesture: UnlockGesture::new(),
            checkpoint: None,
            pile: MemoryPile::new(),
            inspiration: None,
            inspiration_pending: false,
            chat_pending: false,
            alert: None,
            epoch: 0,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Arc<dyn JourneyObserver>) {
        self.observers.push(observer);
    }

    pub fn start(&mut self) -> Result<(), JourneyError> {
        self.expect_view(View::Intro, "start")?;
        self.set_view(View::ThemeSelect);
        Ok(())
    }

    pub fn choose_theme(&mut self, theme: Theme) -> Result<(), JourneyError> {
        self.expect_view(View::ThemeSelect, "choose a theme")?;
        info!(theme = %theme.id, "Theme chosen");
        self.theme = Some(theme);
        self.gesture.reset();
        self.set_view(View::UnlockGesture);
        Ok(())
    }

    pub fn press_unlock(&mut self) -> Result<(), JourneyError> {
        self.expect_view(View::UnlockGesture, "press the capsule")?;
        self.gesture.press();
        Ok(())
    }

    pub fn release_unlock(&mut self) -> Result<(), JourneyError> {
        self.expect_view(View::UnlockGesture, "release the capsule")?;
        self.gesture.release();
        Ok(())
    }

    /// Advances time-driven behaviour: the unlock gesture and the checkpoint
    /// countdown.
    pub fn tick(&mut self, dt: Duration) {
        if self.view == View::UnlockGesture && self.gesture.tick(dt) {
            self.index = 0;
            self.set_view(View::Questioning);
        }

        if let Some(toast) = &mut self.checkpoint {
            if toast.tick(dt) {
                self.checkpoint = None;
                self.emit(&JourneyEvent::CheckpointDismissed);
            }
        }
    }

    /// Records `text` for the current question and moves on. Blank input is
    /// rejected without touching any state.
    pub fn submit_answer(&mut self, text: &str) -> Result<SubmitOutcome, JourneyError> {
        self.expect_view(View::Questioning, "submit an answer")?;
        if text.trim().is_empty() {
            debug!("Ignoring blank answer");
            return Ok(SubmitOutcome::Rejected);
        }

        let question_id = self.questions.at(self.index).id.clone();
        self.answers.record(question_id.clone(), text);
        if let Some(theme) = &self.theme {
            self.pile.push(theme);
        }
        self.inspiration = None;
        self.alert = None;
        self.emit(&JourneyEvent::AnswerRecorded { question_id });

        if self.index < self.questions.last_index() {
            let checkpoint = checkpoint_for(self.index, self.questions.len());
            if let Some(message) = &checkpoint {
                self.checkpoint = Some(CheckpointToast::new(message.clone()));
                self.emit(&JourneyEvent::Checkpoint {
                    message: message.clone(),
                });
            }
            self.index += 1;
            return Ok(SubmitOutcome::Advanced { checkpoint });
        }

        info!(answers = self.answers.len(), "All questions answered");
        self.set_view(View::Generating);
        Ok(SubmitOutcome::Finished(ReviewTicket {
            epoch: self.epoch,
            answers: self.answers.clone(),
            theme_context: self.theme_context().to_string(),
        }))
    }

    /// Steps back one question. False when there is nowhere to go.
    pub fn back(&mut self) -> bool {
        if self.view != View::Questioning || self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.inspiration = None;
        true
    }

    /// Starts an inspiration request for the current question, unless one is
    /// already in flight.
    pub fn begin_inspiration(&mut self) -> Option<InspirationTicket> {
        if self.view != View::Questioning || self.inspiration_pending {
            return None;
        }
        self.inspiration_pending = true;
        self.inspiration = None;

        let question = self.questions.at(self.index);
        Some(InspirationTicket {
            epoch: self.epoch,
            question_id: question.id.clone(),
            prompt: question.prompt_primary.clone(),
        })
    }

    /// Shows `hint` if the user is still on the question it was asked for.
    pub fn finish_inspiration(&mut self, ticket: &InspirationTicket, hint: String) {
        if ticket.epoch != self.epoch {
            debug!("Dropping inspiration from a previous journey");
            return;
        }
        self.inspiration_pending = false;

        let still_current = self.view == View::Questioning
            && self.questions.at(self.index).id == ticket.question_id;
        if still_current {
            self.inspiration = Some(hint);
            self.emit(&JourneyEvent::InspirationReady);
        }
    }

    /// Applies the outcome of review synthesis. On success the chat is seeded
    /// and the journey shows the results; on failure it goes back to the last
    /// question with an alert, answers intact. Returns false for a stale
    /// ticket.
    pub fn complete_review(
        &mut self,
        ticket: ReviewTicket,
        result: Result<AnalysisResult, GenerationError>,
    ) -> bool {
        if ticket.epoch != self.epoch || self.view != View::Generating {
            debug!("Dropping review for a journey that moved on");
            return false;
        }

        match result {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.transcript = ChatTranscript::seeded(ChatMemory {
                    answers: ticket.answers,
                    theme_context: ticket.theme_context,
                });
                self.set_view(View::Results);
            }
            Err(error) => {
                info!("Review failed, returning to questions: {error}");
                self.alert = Some(REVIEW_FAILED_ALERT.to_string());
                self.index = self.questions.last_index();
                self.emit(&JourneyEvent::ReviewFailed {
                    message: REVIEW_FAILED_ALERT.to_string(),
                });
                self.set_view(View::Questioning);
            }
        }
        true
    }

    /// Appends the user's message and hands out the request for a reply.
    /// None for blank input, outside the results view, or while a reply is
    /// outstanding.
    pub fn send_chat(&mut self, text: &str) -> Option<ChatTicket> {
        let message = text.trim();
        if self.view != View::Results || message.is_empty() || self.chat_pending {
            return None;
        }

        let history = self.transcript.clone();
        self.transcript.push_user(message);
        self.chat_pending = true;
        self.emit(&JourneyEvent::ChatUpdated);

        Some(ChatTicket {
            epoch: self.epoch,
            history,
            message: message.to_string(),
        })
    }

    pub fn receive_chat_reply(&mut self, ticket: &ChatTicket, reply: String) {
        if ticket.epoch != self.epoch {
            debug!("Dropping chat reply from a previous journey");
            return;
        }
        self.transcript.push_assistant(reply);
        self.chat_pending = false;
        self.emit(&JourneyEvent::ChatUpdated);
    }

    /// Wipes everything from this journey, theme included, and returns to the
    /// intro. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.theme = None;
        self.index = 0;
        self.answers.clear();
        self.analysis = None;
        self.transcript.clear();
        self.gesture.reset();
        self.checkpoint = None;
        self.pile.clear();
        self.inspiration = None;
        self.inspiration_pending = false;
        self.chat_pending = false;
        self.alert = None;

        info!(epoch = self.epoch, "Journey reset");
        self.set_view(View::Intro);
        self.emit(&JourneyEvent::Reset);
    }

    /// Snapshot of the results card, available once the review is in.
    #[must_use]
    pub fn report(&self) -> Option<ResultsReport> {
        if self.view != View::Results {
            return None;
        }
        self.analysis.as_ref().map(|analysis| {
            ResultsReport::build(&self.questions, &self.answers, analysis, self.theme.as_ref())
        })
    }

    /// Runs review synthesis for `ticket` and applies it, following the
    /// client's [`ReviewFailurePolicy`].
    pub async fn synthesize(&mut self, client: &GenerationClient, ticket: ReviewTicket) -> bool {
        let result = match client.config().review_failure_policy {
            ReviewFailurePolicy::Fallback => Ok(client
                .synthesize_review(&ticket.answers, &ticket.theme_context)
                .await),
            ReviewFailurePolicy::RouteBack => {
                client
                    .try_synthesize_review(&ticket.answers, &ticket.theme_context)
                    .await
            }
        };
        self.complete_review(ticket, result)
    }

    /// Fetches and shows inspiration for the current question.
    pub async fn inspire(&mut self, client: &GenerationClient) -> Option<&str> {
        let ticket = self.begin_inspiration()?;
        let hint = client.fetch_inspiration(&ticket.prompt).await;
        self.finish_inspiration(&ticket, hint);
        self.inspiration()
    }

    /// Sends `text` and waits for the reply.
    pub async fn chat(&mut self, client: &GenerationClient, text: &str) -> Option<&str> {
        let ticket = self.send_chat(text)?;
        let reply = client.continue_chat(&ticket.history, &ticket.message).await;
        self.receive_chat_reply(&ticket, reply);
        self.transcript.turns().last().map(|turn| turn.text.as_str())
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSequence {
        &self.questions
    }

    #[must_use]
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// The chosen theme's generation context, or `"Neutral"`.
    #[must_use]
    pub fn theme_context(&self) -> &str {
        self.theme
            .as_ref()
            .map_or(NEUTRAL_CONTEXT, |theme| theme.generation_context.as_str())
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        self.questions.at(self.index)
    }

    /// The stored answer for the current question, for prefilling after
    /// going back.
    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.answers.get(&self.current_question().id)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f32 {
        (self.index + 1) as f32 / self.questions.len() as f32 * 100.0
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    #[must_use]
    pub fn unlock_progress(&self) -> f32 {
        self.gesture.progress()
    }

    #[must_use]
    pub fn gesture(&self) -> &UnlockGesture {
        &self.gesture
    }

    #[must_use]
    pub fn checkpoint(&self) -> Option<&CheckpointToast> {
        self.checkpoint.as_ref()
    }

    #[must_use]
    pub fn memory_pile(&self) -> &MemoryPile {
        &self.pile
    }

    #[must_use]
    pub fn inspiration(&self) -> Option<&str> {
        self.inspiration.as_deref()
    }

    #[must_use]
    pub fn is_inspiration_pending(&self) -> bool {
        self.inspiration_pending
    }

    #[must_use]
    pub fn is_chat_pending(&self) -> bool {
        self.chat_pending
    }

    /// A user-visible error waiting to be shown.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    fn expect_view(&self, view: View, action: &'static str) -> Result<(), JourneyError> {
        if self.view == view {
            Ok(())
        } else {
            Err(JourneyError::InvalidTransition {
                view: self.view,
                action,
            })
        }
    }

    fn set_view(&mut self, to: View) {
        let from = self.view;
        if from == to {
            return;
        }
        self.view = to;
        debug!(%from, %to, "View changed");
        self.emit(&JourneyEvent::ViewChanged { from, to });
    }

    fn emit(&self, event: &JourneyEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
