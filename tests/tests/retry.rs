//! Conflict retries seen from the session.

use ogm_tests::prelude::*;

fn pet(registry: &Registry) -> Vertex {
    let mut pet = registry.instantiate("Pet").unwrap();
    pet.set_attr("name", "Biggles");
    pet
}

#[tokio::test]
async fn test_write_succeeds_after_transient_conflicts() {
    // GIVEN a store that aborts the next two attempts
    init_tracing();
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = memory_session(&registry, &store).await.unwrap();
    store.inject_conflicts(2);
    let before = store.attempts();

    // WHEN a pet is created
    let mut pet = pet(&registry);
    session.create(&mut pet, false, None).await.unwrap();

    // THEN the third attempt lands
    assert!(pet.exists());
    assert_eq!(store.attempts() - before, 3);
    assert_eq!(store.node_count(), 1);
}

#[tokio::test]
async fn test_write_gives_up_after_max_retries() {
    // GIVEN a store that keeps aborting
    init_tracing();
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = memory_session(&registry, &store).await.unwrap();
    store.inject_conflicts(100);
    let before = store.attempts();

    // WHEN a pet is created
    let mut pet = pet(&registry);
    let result = session.create(&mut pet, false, None).await;

    // THEN the original conflict surfaces after one attempt plus five retries
    let err = match result {
        Err(SessionError::Transaction(err)) => err,
        other => panic!("expected a transaction error, got {:?}", other),
    };
    let store_error = err.store_error().unwrap();
    assert!(store_error.is_retryable());
    assert_eq!(store_error.message, CONFLICT_MESSAGE);
    assert_eq!(store.attempts() - before, 6);
    assert!(!pet.exists());
}

#[tokio::test]
async fn test_read_retries_then_later_write_in_same_transaction() {
    // GIVEN a caller transaction whose first query hits a conflict
    init_tracing();
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = memory_session(&registry, &store).await.unwrap();
    let mut stored = pet(&registry);
    session.create(&mut stored, false, None).await.unwrap();
    let mut txn = session.transaction(false, false);
    store.inject_conflicts(1);

    // WHEN it reads and then writes
    let found = session
        .get("Pet", stored.id().unwrap(), Some(1), Some(&mut txn))
        .await
        .unwrap();
    let mut second = pet(&registry);
    session.create(&mut second, false, Some(&mut txn)).await.unwrap();
    txn.commit().await.unwrap();

    // THEN both calls succeeded on the one transaction
    assert!(found.is_some());
    assert!(second.exists());
    assert_eq!(txn.state(), TxnState::Committed);
}

#[tokio::test]
async fn test_failed_transaction_rejects_further_calls() {
    init_tracing();
    let registry = pet_registry(None).unwrap();
    let store = MemoryStore::new();
    let session = memory_session(&registry, &store).await.unwrap();
    let mut txn = session.transaction(false, false);
    store.inject_conflicts(100);

    let mut first = pet(&registry);
    assert!(session.create(&mut first, false, Some(&mut txn)).await.is_err());
    store.inject_conflicts(0);
    let mut second = pet(&registry);
    let result = session.create(&mut second, false, Some(&mut txn)).await;

    assert_eq!(txn.state(), TxnState::Failed);
    assert!(matches!(
        result,
        Err(SessionError::Transaction(TransactionError::NotOpen { .. }))
    ));
}
