use capsule_journey::{
    prompts::{CHAT_FALLBACK, INSPIRATION_FALLBACK, REVIEW_FAILED_ALERT},
    AnalysisResult, GenerationClient, GenerationConfig, GenerationError, Journey, JourneyError,
    JourneyEvent, JourneyObserver, Question, QuestionSequence, ResultsReport, ReviewFailurePolicy,
    Speaker, SubmitOutcome, Theme, View, CHAT_GREETING,
};
use capsule_sdk::{
    testing::{MockGenerateResult, MockLanguageModel},
    LanguageModelError,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

const TICK: Duration = Duration::from_millis(20);

#[derive(Default)]
struct EventLog(Mutex<Vec<JourneyEvent>>);

impl JourneyObserver for EventLog {
    fn on_event(&self, event: &JourneyEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

impl EventLog {
    fn take(&self) -> Vec<JourneyEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn sequence(len: usize) -> QuestionSequence {
    QuestionSequence::new(
        (1..=len)
            .map(|i| Question::new(format!("q{i}"), "c", format!("prompt {i}"), "secondary"))
            .collect(),
    )
    .unwrap()
}

fn unlock(journey: &mut Journey) {
    journey.press_unlock().unwrap();
    while journey.view() == View::UnlockGesture {
        journey.tick(TICK);
    }
}

/// A journey standing on the first question.
fn questioning(len: usize, theme: &str) -> Journey {
    let mut journey = Journey::new(sequence(len));
    journey.start().unwrap();
    journey.choose_theme(Theme::find(theme).unwrap()).unwrap();
    unlock(&mut journey);
    assert_eq!(journey.view(), View::Questioning);
    journey
}

fn answer_all(journey: &mut Journey) -> SubmitOutcome {
    let mut outcome = SubmitOutcome::Rejected;
    while journey.view() == View::Questioning {
        let id = journey.current_question().id.clone();
        outcome = journey.submit_answer(&format!("answer to {id}")).unwrap();
    }
    outcome
}

fn finished(outcome: SubmitOutcome) -> capsule_journey::ReviewTicket {
    match outcome {
        SubmitOutcome::Finished(ticket) => ticket,
        other => panic!("expected the journey to finish, got {other:?}"),
    }
}

fn mock_client(model: &Arc<MockLanguageModel>, policy: ReviewFailurePolicy) -> GenerationClient {
    GenerationClient::new(
        model.clone(),
        GenerationConfig {
            review_failure_policy: policy,
            ..GenerationConfig::default()
        },
    )
}

#[test]
fn walks_from_intro_to_questioning() {
    let log = Arc::new(EventLog::default());
    let mut journey = Journey::new(sequence(3));
    journey.subscribe(log.clone());

    assert_eq!(journey.view(), View::Intro);
    journey.start().unwrap();
    journey.choose_theme(Theme::find("serene").unwrap()).unwrap();
    assert_eq!(journey.view(), View::UnlockGesture);
    assert!(journey.unlock_progress().abs() < f32::EPSILON);

    unlock(&mut journey);

    assert_eq!(journey.current_index(), 0);
    assert_eq!(
        log.take(),
        vec![
            JourneyEvent::ViewChanged {
                from: View::Intro,
                to: View::ThemeSelect
            },
            JourneyEvent::ViewChanged {
                from: View::ThemeSelect,
                to: View::UnlockGesture
            },
            JourneyEvent::ViewChanged {
                from: View::UnlockGesture,
                to: View::Questioning
            },
        ]
    );
}

#[test]
fn actions_outside_their_view_are_rejected() {
    let mut journey = Journey::new(sequence(3));

    assert!(matches!(
        journey.submit_answer("too early"),
        Err(JourneyError::InvalidTransition {
            view: View::Intro,
            ..
        })
    ));
    assert!(journey.choose_theme(Theme::find("mint").unwrap()).is_err());
    assert!(journey.press_unlock().is_err());

    journey.start().unwrap();
    assert!(journey.start().is_err());
    assert_eq!(journey.view(), View::ThemeSelect);
    assert!(journey.answers().is_empty());
}

#[test]
fn released_gesture_decays_without_opening() {
    let mut journey = Journey::new(sequence(3));
    journey.start().unwrap();
    journey.choose_theme(Theme::find("stoic").unwrap()).unwrap();

    journey.press_unlock().unwrap();
    while journey.unlock_progress() < 40.0 {
        journey.tick(TICK);
    }
    journey.release_unlock().unwrap();

    let mut last = journey.unlock_progress();
    for _ in 0..100 {
        journey.tick(Duration::from_millis(10));
        assert!(journey.unlock_progress() <= last);
        last = journey.unlock_progress();
    }
    assert!(last.abs() < f32::EPSILON);
    assert_eq!(journey.view(), View::UnlockGesture);
}

#[test]
fn submitting_advances_and_records_by_id() {
    let mut journey = questioning(4, "sunshine");

    for i in 0..3 {
        let outcome = journey.submit_answer(&format!("answer {i}")).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Advanced { .. }));
        assert_eq!(journey.current_index(), i + 1);
        assert_eq!(
            journey.answers().get(&format!("q{}", i + 1)),
            Some(format!("answer {i}").as_str())
        );
    }
    assert_eq!(journey.memory_pile().len(), 3);
}

#[test]
fn blank_answers_change_nothing() {
    let mut journey = questioning(3, "maple");
    journey.submit_answer("first").unwrap();

    for blank in ["", "   ", "\n\t"] {
        assert!(matches!(
            journey.submit_answer(blank).unwrap(),
            SubmitOutcome::Rejected
        ));
    }
    assert_eq!(journey.current_index(), 1);
    assert_eq!(journey.answers().len(), 1);
    assert_eq!(journey.memory_pile().len(), 1);
}

#[test]
fn last_answer_moves_to_generating() {
    let mut journey = questioning(3, "mint");
    let ticket = finished(answer_all(&mut journey));

    assert_eq!(journey.view(), View::Generating);
    assert_eq!(ticket.answers.len(), 3);
    assert!(ticket.theme_context.starts_with("Sage Green"));
    assert!(journey.submit_answer("again").is_err());
}

#[test]
fn back_then_resubmit_overwrites() {
    let mut journey = questioning(3, "serene");
    assert!(!journey.back());

    journey.submit_answer("first try").unwrap();
    assert!(journey.back());
    assert_eq!(journey.current_index(), 0);
    assert_eq!(journey.current_answer(), Some("first try"));

    journey.submit_answer("second try").unwrap();
    assert_eq!(journey.answers().len(), 1);
    assert_eq!(journey.answers().get("q1"), Some("second try"));
    assert_eq!(journey.current_index(), 1);
}

#[test]
fn progress_counts_the_current_question() {
    let mut journey = questioning(4, "stoic");
    assert!((journey.progress_percent() - 25.0).abs() < f32::EPSILON);
    journey.submit_answer("a").unwrap();
    assert!((journey.progress_percent() - 50.0).abs() < f32::EPSILON);
}

#[test]
fn checkpoints_fire_every_fifth_answer_but_not_the_last() {
    let log = Arc::new(EventLog::default());
    let mut journey = questioning(10, "sunshine");
    journey.subscribe(log.clone());

    finished(answer_all(&mut journey));

    let checkpoints: Vec<_> = log
        .take()
        .into_iter()
        .filter_map(|event| match event {
            JourneyEvent::Checkpoint { message } => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(
        checkpoints,
        vec!["正在把你的烟火气装入信封... (Collecting your sparks...)".to_string()]
    );
}

#[test]
fn checkpoint_dismisses_itself_without_blocking() {
    let log = Arc::new(EventLog::default());
    let mut journey = questioning(20, "serene");
    journey.subscribe(log.clone());

    for i in 0..5 {
        journey.submit_answer(&format!("a{i}")).unwrap();
    }
    assert!(journey.checkpoint().is_some());

    // answering continues while the checkpoint is shown
    journey.submit_answer("a5").unwrap();
    assert_eq!(journey.current_index(), 6);

    journey.tick(Duration::from_secs(3));
    assert!(journey.checkpoint().is_none());
    assert_eq!(log.take().last(), Some(&JourneyEvent::CheckpointDismissed));
}

#[test]
fn successful_review_shows_results_and_seeds_chat() {
    let mut journey = questioning(2, "maple");
    let ticket = finished(answer_all(&mut journey));

    let analysis = AnalysisResult::offline("Maple Red");
    assert!(journey.complete_review(ticket, Ok(analysis.clone())));

    assert_eq!(journey.view(), View::Results);
    assert_eq!(journey.analysis(), Some(&analysis));
    assert_eq!(journey.transcript().len(), 1);
    assert_eq!(journey.transcript().turns()[0].text, CHAT_GREETING);
    assert_eq!(
        journey.transcript().memory().map(|m| m.answers.clone()),
        Some(journey.answers().clone())
    );
}

#[test]
fn failed_review_routes_back_with_answers_intact() {
    let log = Arc::new(EventLog::default());
    let mut journey = questioning(3, "stoic");
    journey.subscribe(log.clone());
    let ticket = finished(answer_all(&mut journey));
    log.take();

    assert!(journey.complete_review(ticket, Err(GenerationError::EmptyResponse)));

    assert_eq!(journey.view(), View::Questioning);
    assert_eq!(journey.current_index(), 2);
    assert_eq!(journey.answers().len(), 3);
    assert!(journey.analysis().is_none());
    assert_eq!(journey.alert(), Some(REVIEW_FAILED_ALERT));
    assert_eq!(
        log.take(),
        vec![
            JourneyEvent::ReviewFailed {
                message: REVIEW_FAILED_ALERT.to_string()
            },
            JourneyEvent::ViewChanged {
                from: View::Generating,
                to: View::Questioning
            },
        ]
    );

    // resubmitting the last answer retries
    let retry = journey.submit_answer("answer to q3").unwrap();
    finished(retry);
    assert_eq!(journey.alert(), None);
}

#[test]
fn reset_wipes_everything() {
    let log = Arc::new(EventLog::default());
    let mut journey = questioning(2, "sunshine");
    journey.subscribe(log.clone());
    let ticket = finished(answer_all(&mut journey));
    journey.complete_review(ticket, Ok(AnalysisResult::offline("warm")));
    journey.send_chat("hello").unwrap();
    log.take();

    journey.reset();

    assert_eq!(journey.view(), View::Intro);
    assert!(journey.answers().is_empty());
    assert!(journey.transcript().is_empty());
    assert!(journey.transcript().memory().is_none());
    assert!(journey.analysis().is_none());
    assert_eq!(journey.current_index(), 0);
    assert!(journey.theme().is_none());
    assert!(journey.memory_pile().is_empty());
    assert!(!journey.is_chat_pending());
    assert!(journey.unlock_progress().abs() < f32::EPSILON);
    assert_eq!(
        log.take(),
        vec![
            JourneyEvent::ViewChanged {
                from: View::Results,
                to: View::Intro
            },
            JourneyEvent::Reset,
        ]
    );
}

#[test]
fn tickets_from_before_a_reset_are_ignored() {
    let mut journey = questioning(1, "serene");
    let ticket = finished(answer_all(&mut journey));

    journey.reset();
    journey.start().unwrap();

    assert!(!journey.complete_review(ticket, Ok(AnalysisResult::offline("x"))));
    assert_eq!(journey.view(), View::ThemeSelect);
    assert!(journey.analysis().is_none());
}

#[test]
fn inspiration_has_an_in_flight_guard() {
    let mut journey = questioning(3, "mint");

    let ticket = journey.begin_inspiration().unwrap();
    assert_eq!(ticket.prompt, "prompt 1");
    assert!(journey.begin_inspiration().is_none());

    journey.finish_inspiration(&ticket, "try the window".to_string());
    assert_eq!(journey.inspiration(), Some("try the window"));
    assert!(!journey.is_inspiration_pending());

    journey.submit_answer("ok").unwrap();
    assert_eq!(journey.inspiration(), None);

    // a hint for a question the user has left is not shown
    let stale = journey.begin_inspiration().unwrap();
    journey.back();
    journey.finish_inspiration(&stale, "late".to_string());
    assert_eq!(journey.inspiration(), None);
    assert!(journey.begin_inspiration().is_some());
}

#[test]
fn chat_appends_optimistically_and_blocks_while_pending() {
    let mut journey = questioning(1, "stoic");
    let ticket = finished(answer_all(&mut journey));
    journey.complete_review(ticket, Ok(AnalysisResult::offline("Stoic")));

    assert!(journey.send_chat("   ").is_none());
    let ticket = journey.send_chat("  hi there ").unwrap();
    assert_eq!(ticket.message, "hi there");
    assert_eq!(ticket.history.len(), 1);
    assert_eq!(journey.transcript().len(), 2);
    assert!(journey.send_chat("another").is_none());

    journey.receive_chat_reply(&ticket, "hello".to_string());
    let speakers: Vec<_> = journey.transcript().turns().iter().map(|t| t.speaker).collect();
    assert_eq!(
        speakers,
        vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]
    );
    assert!(journey.send_chat("another").is_some());
}

#[test]
fn report_is_available_in_results() {
    let mut journey = questioning(2, "maple");
    assert!(journey.report().is_none());

    let ticket = finished(answer_all(&mut journey));
    journey.complete_review(ticket, Ok(AnalysisResult::offline("Maple")));

    let report = journey.report().unwrap();
    assert_eq!(report.theme_id.as_deref(), Some("maple"));
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[1].answer, "answer to q2");
    assert!(ResultsReport::file_name(42).ends_with("_42.png"));
}

#[tokio::test]
async fn synthesize_falls_back_by_default() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(LanguageModelError::InvalidInput("down".to_string()));
    let client = mock_client(&model, ReviewFailurePolicy::Fallback);

    let mut journey = questioning(2, "sunshine");
    let ticket = finished(answer_all(&mut journey));
    let context = ticket.theme_context.clone();
    assert!(journey.synthesize(&client, ticket).await);

    assert_eq!(journey.view(), View::Results);
    assert_eq!(journey.analysis(), Some(&AnalysisResult::offline(&context)));
}

#[tokio::test]
async fn synthesize_routes_back_when_configured() {
    let model = Arc::new(MockLanguageModel::new());
    model.enqueue_generate(MockGenerateResult::text("not json"));
    let client = mock_client(&model, ReviewFailurePolicy::RouteBack);

    let mut journey = questioning(2, "serene");
    let ticket = finished(answer_all(&mut journey));
    assert!(journey.synthesize(&client, ticket).await);

    assert_eq!(journey.view(), View::Questioning);
    assert_eq!(journey.answers().len(), 2);
    assert_eq!(journey.alert(), Some(REVIEW_FAILED_ALERT));
}

#[tokio::test]
async fn inspire_and_chat_recover_from_backend_errors() {
    let model = Arc::new(MockLanguageModel::new());
    model
        .enqueue_generate(LanguageModelError::InvalidInput("down".to_string()))
        .enqueue_generate(LanguageModelError::InvalidInput("down".to_string()));
    let client = mock_client(&model, ReviewFailurePolicy::Fallback);

    let mut journey = questioning(1, "maple");
    assert_eq!(journey.inspire(&client).await, Some(INSPIRATION_FALLBACK));

    let ticket = finished(answer_all(&mut journey));
    journey.complete_review(ticket, Ok(AnalysisResult::offline("Maple")));
    assert_eq!(journey.chat(&client, "hello").await, Some(CHAT_FALLBACK));
    assert_eq!(journey.transcript().len(), 3);
    assert!(!journey.is_chat_pending());
}
