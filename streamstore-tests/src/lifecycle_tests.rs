use fake::faker::name::en::Name;
use fake::Fake;
use streamstore_core::{ExpectedVersion, NewMessage, StreamStoreError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::tests::new_store;

#[tokio::test]
async fn operations_after_close_fail_with_object_disposed() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();

    store.close().await;

    let err = store
        .read_stream_forwards(&stream, 0, 10, true, &token)
        .await
        .unwrap_err();

    assert!(matches!(err, StreamStoreError::ObjectDisposed));

    let err = store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            vec![NewMessage::new(Uuid::new_v4(), "t", "\"d\"", "\"m\"")],
            &token,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StreamStoreError::ObjectDisposed));

    Ok(())
}

#[tokio::test]
async fn close_is_idempotent() -> eyre::Result<()> {
    let store = new_store();

    store.close().await;
    store.close().await;

    Ok(())
}

#[tokio::test]
async fn a_cancelled_token_short_circuits_before_touching_the_driver() -> eyre::Result<()> {
    let store = new_store();
    let stream: String = Name().fake();

    let token = CancellationToken::new();
    token.cancel();

    let err = store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            vec![NewMessage::new(Uuid::new_v4(), "t", "\"d\"", "\"m\"")],
            &token,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StreamStoreError::OperationCancelled));

    let page = store
        .read_stream_forwards(&stream, 0, 10, true, &token)
        .await
        .unwrap_err();
    assert!(matches!(page, StreamStoreError::OperationCancelled));

    Ok(())
}
