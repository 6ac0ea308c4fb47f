use jarvis::memory::{
    ConversationLog, ConversationStore, InMemoryConversationLog, MemoryError, Role,
};
use tempfile::tempdir;

#[test]
fn test_open_creates_file_and_parents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("memory.json");

    let log = ConversationLog::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(log.path(), path.as_path());
    assert!(log.list(10).is_empty());

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["memories"], serde_json::json!([]));
}

#[test]
fn test_entries_survive_reopen_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.json");

    {
        let mut log = ConversationLog::open(&path).unwrap();
        log.add(Role::User, "hola").unwrap();
        log.add(Role::Assistant, "Hola, ¿en qué te ayudo?").unwrap();
        log.add(Role::User, "ejecuta dir").unwrap();
    }

    let log = ConversationLog::open(&path).unwrap();
    let entries = log.list(10);
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["hola", "Hola, ¿en qué te ayudo?", "ejecuta dir"]);
    assert_eq!(entries[1].role, Role::Assistant);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"role\": \"assistant\""));
}

#[test]
fn test_list_returns_most_recent() {
    let mut log = InMemoryConversationLog::new();
    for i in 0..5 {
        log.add(Role::User, &format!("mensaje {}", i)).unwrap();
    }
    let last: Vec<String> = log.list(2).into_iter().map(|e| e.text).collect();
    assert_eq!(last, ["mensaje 3", "mensaje 4"]);
    assert_eq!(log.list(0).len(), 0);
    assert_eq!(log.list(100).len(), 5);
}

#[test]
fn test_clear_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.json");

    let mut log = ConversationLog::open(&path).unwrap();
    log.add(Role::User, "hola").unwrap();
    log.clear().unwrap();

    assert!(ConversationLog::open(&path).unwrap().list(10).is_empty());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(ConversationLog::open(&path), Err(MemoryError::Serialization(_))));
}
