use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use homework_bot::error::BotError;
use homework_bot::practicum::PracticumApi;
use homework_bot::services::poller::NO_NEW_WORK_MESSAGE;
use homework_bot::services::{CycleOutcome, Poller};
use homework_bot::telegram::Notifier;
use serde_json::{Value, json};

/// Returns each scripted response in order and records every `from_date`
/// the poller asked for.
struct ScriptedApi {
    responses: Mutex<Vec<Result<Value, BotError>>>,
    calls: Mutex<Vec<i64>>,
}

impl ScriptedApi {
    fn new(responses: Vec<Result<Value, BotError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PracticumApi for ScriptedApi {
    async fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        self.calls.lock().unwrap().push(from_date);
        self.responses.lock().unwrap().remove(0)
    }
}

struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            Err(BotError::Delivery("chat unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn approved_response(current_date: i64) -> Value {
    json!({
        "homeworks": [{"homework_name": "hw1", "status": "approved"}],
        "current_date": current_date
    })
}

const APPROVED_MESSAGE: &str =
    "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";

#[tokio::test]
async fn status_change_is_notified() {
    let api = ScriptedApi::new(vec![Ok(approved_response(1000))]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;

    assert_eq!(notifier.sent(), vec![APPROVED_MESSAGE.to_string()]);
    assert_eq!(poller.last_sent(), Some(APPROVED_MESSAGE));
}

#[tokio::test]
async fn duplicate_status_is_sent_once() {
    let api = ScriptedApi::new(vec![
        Ok(approved_response(1000)),
        Ok(approved_response(2000)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;
    poller.tick().await;

    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn cursor_advances_on_success() {
    let api = ScriptedApi::new(vec![
        Ok(approved_response(1000)),
        Ok(approved_response(2000)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;
    poller.tick().await;

    let calls = api.calls();
    assert_eq!(calls[1], 1000);
    assert_eq!(poller.cursor(), 2000);
}

#[tokio::test]
async fn cursor_stays_on_failure() {
    let api = ScriptedApi::new(vec![
        Err(BotError::HttpStatus {
            code: 503,
            reason: "Service Unavailable".to_string(),
            body: String::new(),
        }),
        Ok(approved_response(1000)),
    ]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;
    poller.tick().await;

    let calls = api.calls();
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn cursor_stays_on_parse_failure() {
    let response = json!({
        "homeworks": [{"homework_name": "hw1", "status": "lost"}],
        "current_date": 5000
    });
    let api = ScriptedApi::new(vec![Ok(response)]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);
    let before = poller.cursor();

    poller.tick().await;

    assert_eq!(poller.cursor(), before);
}

#[tokio::test]
async fn empty_homeworks_is_no_new_work() {
    let api = ScriptedApi::new(vec![Ok(json!({"homeworks": [], "current_date": 1000}))]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    let outcome = poller.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::NoNewWork));

    poller.dispatch(&outcome).await;
    assert_eq!(notifier.sent(), vec![NO_NEW_WORK_MESSAGE.to_string()]);
    assert_eq!(poller.cursor(), 1000);
}

#[tokio::test]
async fn empty_response_is_contained() {
    let api = ScriptedApi::new(vec![Ok(json!({})), Ok(approved_response(1000))]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    let outcome = poller.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::Failed(BotError::EmptyResponse)));
    poller.dispatch(&outcome).await;

    // The loop survives and the next cycle works normally.
    poller.tick().await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("Сбой в работе телеграмм-бота: "));
    assert_eq!(sent[1], APPROVED_MESSAGE);
}

#[tokio::test]
async fn repeated_failure_is_reported_once() {
    let api = ScriptedApi::new(vec![
        Err(BotError::Transport("connection refused".to_string())),
        Err(BotError::Transport("connection refused".to_string())),
    ]);
    let notifier = RecordingNotifier::new();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;
    poller.tick().await;

    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn delivery_failure_is_swallowed() {
    let api = ScriptedApi::new(vec![
        Ok(approved_response(1000)),
        Ok(approved_response(2000)),
    ]);
    let notifier = RecordingNotifier::failing();
    let mut poller = Poller::new(api.clone(), notifier.clone(), 600);

    poller.tick().await;
    // The message stays cached even though delivery failed, so the second
    // identical cycle is suppressed rather than retried.
    poller.tick().await;

    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(poller.last_sent(), Some(APPROVED_MESSAGE));
}
