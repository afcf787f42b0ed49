//! Integration tests for the message store against in-memory and local
//! filesystem OpenDAL backends.

use comfy_core::Message;
use comfy_storage::operator::{build_fs_operator, build_memory_operator};
use comfy_storage::MessageStore;

fn record(chat_id: &str, id: &str, created_at: u64, content: &str) -> Message {
    Message {
        id: id.into(),
        chat_id: chat_id.into(),
        sender_id: Some("user-1".into()),
        content: content.into(),
        created_at,
        updated_at: None,
    }
}

#[tokio::test]
async fn save_then_load() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    let msg = record("chat-1", "m1", 100, "cms1:opaque");

    store.save(&msg).await.unwrap();
    let loaded = store.load("chat-1", "m1").await.unwrap();

    assert_eq!(loaded, Some(msg));
}

#[tokio::test]
async fn load_missing_is_none() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    assert_eq!(store.load("chat-1", "nope").await.unwrap(), None);
}

#[tokio::test]
async fn list_missing_chat_is_empty() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    assert!(store.list("never-used").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_ordered_and_scoped_to_chat() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    store.save(&record("chat-1", "b", 200, "second")).await.unwrap();
    store.save(&record("chat-1", "a", 100, "first")).await.unwrap();
    store.save(&record("chat-1", "c", 200, "third")).await.unwrap();
    store.save(&record("chat-2", "z", 50, "other chat")).await.unwrap();

    let ids: Vec<String> = store
        .list("chat-1")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn save_overwrites_existing_record() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    let msg = record("chat-1", "m1", 100, "old");
    store.save(&msg).await.unwrap();
    store.save(&msg.clone().with_content("new".into())).await.unwrap();

    let all = store.list("chat-1").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "new");
}

#[tokio::test]
async fn delete_removes_record() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    store.save(&record("chat-1", "m1", 100, "x")).await.unwrap();

    store.delete("chat-1", "m1").await.unwrap();
    assert_eq!(store.load("chat-1", "m1").await.unwrap(), None);

    // Deleting again is fine
    store.delete("chat-1", "m1").await.unwrap();
}

#[tokio::test]
async fn hostile_chat_ids_stay_separate() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    store.save(&record("../chat", "m1", 1, "dots")).await.unwrap();
    store.save(&record("chat", "m1", 1, "plain")).await.unwrap();

    assert_eq!(store.list("../chat").await.unwrap()[0].content, "dots");
    assert_eq!(store.list("chat").await.unwrap()[0].content, "plain");
}

#[tokio::test]
async fn fs_backend_persists_across_operators() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().to_string();

    let writer = MessageStore::new(build_fs_operator(&root).unwrap(), "comfy");
    writer.save(&record("chat-1", "m1", 1, "on disk")).await.unwrap();

    let reader = MessageStore::new(build_fs_operator(&root).unwrap(), "comfy");
    let all = reader.list("chat-1").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "on disk");
}

#[tokio::test]
async fn corrupt_record_is_storage_error() {
    let store = MessageStore::new(build_memory_operator().unwrap(), "test");
    store
        .operator()
        .write("test/chats/chat-1/messages/bad.json", b"not json".to_vec())
        .await
        .unwrap();

    let err = store.list("chat-1").await.unwrap_err();
    assert!(matches!(err, comfy_core::ComfyError::Storage(_)));
}
