use chat_recall::models::Role;
use chat_recall::normalizer::{normalize_value, FallbackIdStrategy, NormalizerConfig};
use serde_json::json;

fn normalize(value: serde_json::Value) -> Vec<chat_recall::Conversation> {
    normalize_value(&value, &NormalizerConfig::default())
}

#[test]
fn test_claude_export_shape() {
    let conversations = normalize(json!([{
        "uuid": "9f1c",
        "name": "Refactoring help",
        "created_at": "2024-03-02T09:15:00.000000Z",
        "chat_messages": [
            {
                "sender": "human",
                "text": "Can you split this function?",
                "created_at": "2024-03-02T09:15:00Z"
            },
            {
                "sender": "assistant",
                "content": [
                    {"type": "text", "text": "Sure."},
                    {"type": "tool_use", "name": "editor", "input": {}},
                    {"type": "text", "text": "Here is the split version."}
                ],
                "created_at": "2024-03-02T09:15:10Z"
            }
        ]
    }]));

    assert_eq!(conversations.len(), 1);
    let conversation = &conversations[0];
    assert_eq!(conversation.id, "9f1c");
    assert_eq!(conversation.title, "Refactoring help");
    assert_eq!(
        conversation.created_at.to_rfc3339(),
        "2024-03-02T09:15:00+00:00"
    );
    assert_eq!(conversation.messages[0].role, Role::User);
    assert_eq!(
        conversation.messages[0].timestamp.as_deref(),
        Some("2024-03-02T09:15:00Z")
    );
    assert_eq!(conversation.messages[1].role, Role::Assistant);
    assert_eq!(
        conversation.messages[1].content,
        "Sure.\nHere is the split version."
    );
}

#[test]
fn test_chatgpt_style_messages() {
    let conversations = normalize(json!({
        "conversations": [{
            "conversation_id": "abc-123",
            "title": "Trip planning",
            "create_time": 1_700_000_000.5,
            "messages": [
                {"author": {"role": "user"}, "content": {"content_type": "text", "parts": ["Plan a", "weekend"]}},
                {"author": {"role": "assistant"}, "content": {"parts": ["Day one..."]}},
                {"author": {"role": "tool"}, "content": {"parts": []}}
            ]
        }]
    }));

    let conversation = &conversations[0];
    assert_eq!(conversation.id, "abc-123");
    assert_eq!(conversation.created_at.timestamp(), 1_700_000_000);
    assert_eq!(conversation.messages.len(), 3);
    assert_eq!(conversation.messages[0].content, "Plan a\nweekend");
    assert_eq!(conversation.messages[1].role, Role::Assistant);
    assert_eq!(conversation.messages[2].role, Role::Unknown);
    assert_eq!(conversation.messages[2].content, "");
}

#[test]
fn test_named_chat_scenario() {
    let conversations = normalize(json!({
        "name": "Chat A",
        "chat_messages": [{"sender": "human", "text": "hi"}]
    }));

    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].title, "Chat A");
    assert_eq!(conversations[0].messages.len(), 1);
    assert_eq!(conversations[0].messages[0].role, Role::User);
    assert_eq!(conversations[0].messages[0].content, "hi");
}

#[test]
fn test_first_container_key_wins() {
    let conversations = normalize(json!({
        "chats": [{"id": "from-chats"}],
        "conversations": [{"id": "from-conversations"}]
    }));

    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id, "from-conversations");
}

#[test]
fn test_missing_fields_never_fail() {
    let conversations = normalize(json!([
        {"messages": [{}]},
        {"messages": "not a list", "content": null}
    ]));

    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0].messages.len(), 1);
    assert_eq!(conversations[0].messages[0].role, Role::Unknown);
    assert_eq!(conversations[0].messages[0].content, "");
    assert!(conversations[0].messages[0].timestamp.is_none());
    assert!(conversations[1].messages.is_empty());
}

#[test]
fn test_content_hash_ids_are_deterministic_and_distinct() {
    let doc = json!([
        {"title": "one", "messages": [{"role": "user", "content": "a"}]},
        {"title": "two", "messages": [{"role": "user", "content": "b"}]}
    ]);

    let first = normalize(doc.clone());
    let second = normalize(doc);

    assert_eq!(first[0].id, second[0].id);
    assert_eq!(first[1].id, second[1].id);
    assert_ne!(first[0].id, first[1].id);
    assert!(first[1].id.starts_with("conv_1_"));
}

#[test]
fn test_timestamp_ids_change_between_runs() {
    let config = NormalizerConfig {
        fallback_id: FallbackIdStrategy::Timestamp,
    };
    let doc = json!({"title": "untitled"});

    let first = normalize_value(&doc, &config);
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = normalize_value(&doc, &config);

    assert_ne!(first[0].id, second[0].id);
}
