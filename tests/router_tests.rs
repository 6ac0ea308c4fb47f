use async_trait::async_trait;
use jarvis::intent::{Action, ActionKind, IntentClassifier, VolumeMode};
use jarvis::memory::Role;
use jarvis::services::executor::{ActionExecutor, ActionOutcome, MailDraft};
use jarvis::services::llm::{ResponseCascade, SourceTag};
use jarvis::wake::WakePhraseDetector;
use jarvis::{Assistant, TurnOutcome};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingExecutor {
    actions: Mutex<Vec<Action>>,
    mails: Mutex<Vec<MailDraft>>,
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(&self, action: &Action) -> ActionOutcome {
        self.actions.lock().unwrap().push(action.clone());
        ActionOutcome::ok("hecho")
    }

    async fn send_mail(&self, draft: &MailDraft) -> ActionOutcome {
        self.mails.lock().unwrap().push(draft.clone());
        ActionOutcome::ok(format!("Correo enviado a {}", draft.to))
    }
}

fn assistant() -> (Assistant, Arc<RecordingExecutor>) {
    let executor = Arc::new(RecordingExecutor::default());
    let assistant = Assistant::new(
        IntentClassifier::default(),
        WakePhraseDetector::default(),
        Arc::new(ResponseCascade::fallback_only()),
        executor.clone(),
    );
    (assistant, executor)
}

#[tokio::test]
async fn test_conversation_goes_to_cascade() {
    let (mut assistant, executor) = assistant();

    let outcome = assistant.handle_turn("hola").await;
    let TurnOutcome::Reply(reply) = outcome else {
        panic!("expected a reply, got {:?}", outcome);
    };
    assert_eq!(reply.source, SourceTag::Fallback);
    assert!(executor.actions.lock().unwrap().is_empty());

    let history = assistant.history(10);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "hola");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].text, reply.text);
}

#[tokio::test]
async fn test_system_action_is_executed() {
    let (mut assistant, executor) = assistant();

    let outcome = assistant.handle_turn("ejecuta dir").await;
    assert_eq!(
        outcome,
        TurnOutcome::Executed {
            confirmation: "Ejecutando: dir".to_string(),
            outcome: ActionOutcome::ok("hecho"),
        }
    );
    assert_eq!(
        *executor.actions.lock().unwrap(),
        vec![Action::Exec { command: "dir".into() }]
    );
}

#[tokio::test]
async fn test_confirm_mode_holds_action() {
    let (assistant, executor) = assistant();
    let mut assistant = assistant.with_confirmation(true);

    let outcome = assistant.handle_turn("sube el volumen a 70").await;
    let TurnOutcome::PendingConfirmation { action, confirmation } = outcome else {
        panic!("expected pending confirmation, got {:?}", outcome);
    };
    assert_eq!(confirmation, "Ajustando volumen a 70");
    assert!(executor.actions.lock().unwrap().is_empty());

    let outcome = assistant.confirm(action).await;
    assert!(matches!(outcome, TurnOutcome::Executed { .. }));
    assert_eq!(
        *executor.actions.lock().unwrap(),
        vec![Action::Volume { mode: VolumeMode::Set, value: 70 }]
    );
}

#[tokio::test]
async fn test_mail_needs_draft() {
    let (mut assistant, executor) = assistant();

    let outcome = assistant.handle_turn("envía un correo").await;
    assert_eq!(outcome.message(), "Preparando envío de correo...");
    assert!(matches!(outcome, TurnOutcome::NeedsMailDraft { .. }));

    let draft = MailDraft {
        to: "ana@example.com".into(),
        subject: "Hola".into(),
        body: "Nos vemos mañana".into(),
    };
    let sent = assistant.send_mail(&draft).await;
    assert!(sent.success);
    assert_eq!(*executor.mails.lock().unwrap(), vec![draft]);
    assert!(executor.actions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_direct_action_bypasses_classifier() {
    let (mut assistant, executor) = assistant();

    let outcome = assistant
        .handle_action("!open /tmp/Notas.txt", Action::Open { path: "/tmp/Notas.txt".into() })
        .await;
    assert_eq!(outcome.message(), "Abriendo: /tmp/Notas.txt");
    assert_eq!(executor.actions.lock().unwrap().len(), 1);

    let history = assistant.history(10);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "!open /tmp/Notas.txt");
    assert_eq!(history[1].role, Role::Assistant);
    assert!(history[1].text.starts_with("Abriendo: /tmp/Notas.txt"));
}

#[tokio::test]
async fn test_wake_gate_is_recorded() {
    let (mut assistant, _) = assistant();

    assert!(assistant.accept_transcript("oye jarvis").matched);
    assert!(!assistant.accept_transcript("hola").matched);

    let snapshot = assistant.telemetry.snapshot();
    assert_eq!(snapshot.wake_stats.checks, 2);
    assert_eq!(snapshot.wake_stats.matched, 1);
}

#[tokio::test]
async fn test_turn_telemetry_counts() {
    let (mut assistant, _) = assistant();

    assistant.handle_turn("hola").await;
    assistant.handle_turn("quién eres").await;
    assistant.handle_turn("ejecuta dir").await;

    let snapshot = assistant.telemetry.snapshot();
    assert_eq!(snapshot.turns(ActionKind::Conversation), 2);
    assert_eq!(snapshot.turns(ActionKind::Exec), 1);
    assert_eq!(snapshot.turns(ActionKind::Open), 0);
    assert_eq!(snapshot.responses(SourceTag::Fallback), 2);
    assert_eq!(snapshot.responses(SourceTag::Local), 0);
    assert_eq!(snapshot.action_stats.succeeded, 1);
}
