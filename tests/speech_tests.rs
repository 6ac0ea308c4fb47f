use async_trait::async_trait;
use jarvis::config::SpeechSettings;
use jarvis::services::speech::{SpeechDispatcher, Speaker};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct StuckSpeaker;

#[async_trait]
impl Speaker for StuckSpeaker {
    async fn speak(&self, _text: &str) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_dispatch_speaks_trimmed_text() {
    let speaker = Arc::new(RecordingSpeaker::default());
    let dispatcher = SpeechDispatcher::new(speaker.clone());

    let handle = dispatcher.dispatch("  Hola, soy JARVIS  ").unwrap();
    handle.await.unwrap();

    assert_eq!(*speaker.spoken.lock().unwrap(), vec!["Hola, soy JARVIS".to_string()]);
}

#[tokio::test]
async fn test_blank_or_disabled_is_skipped() {
    let dispatcher = SpeechDispatcher::new(Arc::new(RecordingSpeaker::default()));
    assert!(dispatcher.dispatch("   ").is_none());

    let disabled = SpeechDispatcher::from_settings(&SpeechSettings {
        enabled: false,
        program: "espeak".into(),
    });
    assert!(!disabled.is_enabled());
    assert!(disabled.dispatch("hola").is_none());
}

#[tokio::test]
async fn test_shutdown_abandons_playback() {
    let dispatcher = SpeechDispatcher::new(Arc::new(StuckSpeaker));
    let handle = dispatcher.dispatch("esto tarda").unwrap();

    dispatcher.shutdown();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("speech task should stop on shutdown")
        .unwrap();
}
