use fake::faker::name::en::Name;
use fake::Fake;
use streamstore_core::{ExpectedVersion, NewMessage, PageReadStatus};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::tests::new_store;

fn message(id: Uuid) -> NewMessage {
    NewMessage::new(id, "test-event", "\"d\"", "\"m\"")
}

#[tokio::test]
async fn append_to_new_stream() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();
    let id = Uuid::new_v4();

    let result = store
        .append(&stream, ExpectedVersion::NoStream, vec![message(id)], &token)
        .await?;

    assert_eq!(result.current_version, 0);

    let page = store
        .read_stream_forwards(&stream, 0, 10, true, &token)
        .await?;

    assert_eq!(page.status, PageReadStatus::Success);
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].stream_version, 0);
    assert_eq!(page.messages[0].message_id, id);
    assert!(page.is_end);
    assert_eq!(page.next.from_version, 1);

    Ok(())
}

#[tokio::test]
async fn idempotent_replay_returns_identical_result() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();
    let id = Uuid::new_v4();

    let first = store
        .append(&stream, ExpectedVersion::NoStream, vec![message(id)], &token)
        .await?;

    let head_before = store.read_head_position(&token).await?;

    let second = store
        .append(&stream, ExpectedVersion::NoStream, vec![message(id)], &token)
        .await?;

    assert_eq!(first.current_version, second.current_version);
    assert_eq!(first.current_position, second.current_position);
    assert_eq!(store.read_head_position(&token).await?, head_before);

    Ok(())
}

#[tokio::test]
async fn conflicting_expected_version_is_rejected() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();

    store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            vec![message(Uuid::new_v4())],
            &token,
        )
        .await?;

    let err = store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            vec![message(Uuid::new_v4())],
            &token,
        )
        .await
        .unwrap_err();

    match err {
        streamstore_core::StreamStoreError::WrongExpectedVersion {
            expected, actual, ..
        } => {
            assert_eq!(expected, ExpectedVersion::NoStream);
            assert_eq!(actual, Some(0));
        }
        other => panic!("expected WrongExpectedVersion, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn look_ahead_paging_splits_across_two_pages() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();

    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            ids.iter().copied().map(message).collect(),
            &token,
        )
        .await?;

    let first_page = store
        .read_stream_forwards(&stream, 0, 2, true, &token)
        .await?;

    assert_eq!(
        first_page
            .messages
            .iter()
            .map(|m| m.stream_version)
            .collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert!(!first_page.is_end);
    assert_eq!(first_page.next.from_version, 2);

    let second_page = store.next_stream_page(&first_page.next, &token).await?;

    assert_eq!(
        second_page
            .messages
            .iter()
            .map(|m| m.stream_version)
            .collect::<Vec<_>>(),
        vec![2]
    );
    assert!(second_page.is_end);
    assert_eq!(second_page.next.from_version, 3);

    Ok(())
}

#[tokio::test]
async fn backward_full_read_is_forward_read_reversed() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();

    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    store
        .append(
            &stream,
            ExpectedVersion::NoStream,
            ids.iter().copied().map(message).collect(),
            &token,
        )
        .await?;

    let forward = store
        .read_stream_forwards(&stream, 0, 10, true, &token)
        .await?;

    let backward = store
        .read_stream_backwards(&stream, -1, 10, true, &token)
        .await?;

    let mut forward_versions: Vec<i64> = forward.messages.iter().map(|m| m.stream_version).collect();
    let backward_versions: Vec<i64> = backward.messages.iter().map(|m| m.stream_version).collect();

    forward_versions.reverse();
    assert_eq!(forward_versions, backward_versions);
    assert!(backward.is_end);

    Ok(())
}

#[tokio::test]
async fn reading_a_missing_stream_reports_stream_not_found() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();

    let page = store
        .read_stream_forwards(&stream, 0, 10, true, &token)
        .await?;

    assert_eq!(page.status, PageReadStatus::StreamNotFound);
    assert!(page.messages.is_empty());
    assert!(page.is_end);
    assert_eq!(page.last_stream_version, -1);
    assert_eq!(page.last_stream_position, -1);

    Ok(())
}

#[tokio::test]
async fn read_all_forwards_observes_every_stream_in_commit_order() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream_a: String = Name().fake();
    let stream_b: String = Name().fake();

    store
        .append(
            &stream_a,
            ExpectedVersion::NoStream,
            vec![message(Uuid::new_v4())],
            &token,
        )
        .await?;
    store
        .append(
            &stream_b,
            ExpectedVersion::NoStream,
            vec![message(Uuid::new_v4())],
            &token,
        )
        .await?;

    let page = store.read_all_forwards(0, 10, false, &token).await?;

    assert_eq!(page.messages.len(), 2);
    assert!(page.messages[0].position < page.messages[1].position);
    assert!(page.is_end);

    let head = store.read_head_position(&token).await?;
    assert_eq!(head, page.messages[1].position);

    Ok(())
}

#[tokio::test]
async fn lazy_read_omits_payload_until_fetched() -> eyre::Result<()> {
    let store = new_store();
    let token = CancellationToken::new();
    let stream: String = Name().fake();
    let id = Uuid::new_v4();

    store
        .append(&stream, ExpectedVersion::NoStream, vec![message(id)], &token)
        .await?;

    let page = store
        .read_stream_forwards(&stream, 0, 10, false, &token)
        .await?;

    assert!(page.messages[0].payload.is_none());

    let (payload, metadata) = store.read_message_data(&stream, id, &token).await?;
    assert_eq!(payload, "\"d\"");
    assert_eq!(metadata, "\"m\"");

    Ok(())
}
