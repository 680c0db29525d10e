use feed_core::{update, AppState, Credential, Msg};

#[test]
fn collapse_with_nothing_expanded_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::CollapsePost { post_id: None });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn retry_before_any_request_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Retry { at: 0 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn expand_before_feed_loaded_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::ExpandPost {
            post_id: "abc".to_string(),
            at: 0,
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn restored_credential_is_not_written_back() {
    let (state, effects) = update(
        AppState::new(),
        Msg::CredentialRestored(Credential::new("kept")),
    );

    assert!(effects.is_empty());
    assert_eq!(state.credential(), Some(&Credential::new("kept")));
}
