use crate::{render_history, SessionStore, HISTORY_WINDOW, MAX_SESSIONS, NO_HISTORY};

#[tokio::test]
async fn fresh_session_renders_the_sentinel() {
    let store = SessionStore::new(MAX_SESSIONS);
    let (id, _) = store.get_or_create(None).await;

    let history = store.history(&id, HISTORY_WINDOW).await;
    assert_eq!(render_history(&history), NO_HISTORY);
}

#[tokio::test]
async fn prompt_window_covers_only_recent_exchanges() {
    let store = SessionStore::new(MAX_SESSIONS);
    let (id, _) = store.get_or_create(None).await;

    for i in 0..HISTORY_WINDOW + 2 {
        store
            .append_exchange(&id, format!("question {i}"), format!("answer {i}"))
            .await;
    }

    let history = store.history(&id, HISTORY_WINDOW).await;
    let text = render_history(&history);

    assert!(!text.contains("question 0"));
    assert!(!text.contains("question 1"));
    assert!(text.contains("question 2"));
    assert!(text.contains(&format!("question {}", HISTORY_WINDOW + 1)));
}

#[tokio::test]
async fn concurrent_appends_are_not_lost() {
    use std::sync::Arc;

    let store = Arc::new(SessionStore::new(MAX_SESSIONS));
    let (id, _) = store.get_or_create(None).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            store.append_exchange(&id, format!("q{i}"), format!("a{i}")).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.total_exchanges().await, 8);
}
