use jarvis::wake::{similarity, MatchResult, WakePhraseDetector, WakeWordConfig};
use jarvis::RouterError;

fn detector() -> WakePhraseDetector {
    WakePhraseDetector::default()
}

#[test]
fn test_similarity_edges() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("", "x"), 0.0);
    assert_eq!(similarity("x", ""), 0.0);
    assert_eq!(similarity("Jarvis", "jarvis"), 1.0);
    assert_eq!(similarity("jarvis", "jarmis"), similarity("jarmis", "jarvis"));
}

#[test]
fn test_detect_exact_and_embedded() {
    let d = detector();
    assert_eq!(d.detect("jarvis"), MatchResult::hit("jarvis"));
    assert!(d.detect("oye jarvis por favor").matched);
    assert!(d.detect("  HEY JARVIS  ").matched);
}

#[test]
fn test_detect_noisy_transcription() {
    let d = detector();
    assert!(d.detect("jarmis").matched, "single substitution should pass at 0.70");
    assert!(d.detect("oye yarvis abre el navegador").matched);
}

#[test]
fn test_detect_rejects_unrelated_speech() {
    let d = detector();
    assert!(!d.detect("hola").matched);
    assert!(!d.detect("qué tal el día").matched);
    assert_eq!(d.detect("hola").phrase, None);
}

#[test]
fn test_empty_transcript_never_matches() {
    let d = detector();
    assert!(!d.detect("").matched);
    assert!(!d.detect("   ").matched);
}

#[test]
fn test_first_configured_phrase_wins() {
    let config = WakeWordConfig::new(["computadora", "jarvis"], 0.7).unwrap();
    let d = WakePhraseDetector::new(config);
    let result = d.detect("jarvis computadora");
    assert_eq!(result.phrase.as_deref(), Some("computadora"));
}

#[test]
fn test_short_tokens_are_not_fuzzy_matched() {
    let config = WakeWordConfig::new(["ok"], 0.5).unwrap();
    let d = WakePhraseDetector::new(config);
    // "oh" is one substitution away but below the token length floor.
    assert!(!d.detect("oh no sé").matched);
}

#[test]
fn test_config_validation() {
    assert!(matches!(
        WakeWordConfig::new(["jarvis"], 1.5),
        Err(RouterError::InvalidInput(_))
    ));
    assert!(matches!(
        WakeWordConfig::new(["  ", ""], 0.7),
        Err(RouterError::InvalidInput(_))
    ));

    let config = WakeWordConfig::new(["Jarvis", "jarvis ", "Hey Jarvis"], 0.75).unwrap();
    assert_eq!(config.phrases(), &["jarvis".to_string(), "hey jarvis".to_string()]);
    assert_eq!(config.threshold(), 0.75);
}

#[test]
fn test_detect_bytes_rejects_invalid_utf8() {
    let d = detector();
    assert!(d.detect_bytes("hey jarvis".as_bytes()).unwrap().matched);
    assert!(matches!(
        d.detect_bytes(&[0xff, 0xfe, 0x00]),
        Err(RouterError::InvalidInput(_))
    ));
}

#[test]
fn test_whole_transcript_pass_runs_before_token_pass() {
    // "jarvix" alone is close to "jarvis", but the whole transcript is
    // closer still to "hola jarvis", so the earlier pass decides.
    let config = WakeWordConfig::new(["jarvis", "hola jarvis"], 0.7).unwrap();
    let d = WakePhraseDetector::new(config);

    assert!(similarity("jarvix", "jarvis") >= 0.7);
    assert!(similarity("hola jarvix", "jarvis") < 0.7);

    let result = d.detect("hola jarvix");
    assert_eq!(result, MatchResult::hit("hola jarvis"));
}
