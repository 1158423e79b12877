use crate::transport::helpers::{Behaviour, start_fake_service, wait_for_state, wait_until};

use covert_core::error::CoreError;
use covert_core::error::session::SessionError;
use covert_core::session::{SessionEvent, SessionState};
use covert_core::transport::{FixedTimeout, NoTimeout, OperatorAction, SessionHandle};

use std::time::Duration;

/// **VALUE**: Verifies connecting requests the schema and reaches Ready on the reply.
///
/// **WHY THIS MATTERS**: This is the whole bootstrap path: socket, schema request as the
/// first frame, reply routed into the registry, snapshot published.
///
/// **BUG THIS CATCHES**: Would catch the schema request not being sent, being sent as a
/// text frame, or the snapshot never being refreshed.
#[tokio::test]
async fn given_fake_service_when_session_connects_then_schema_requested_and_ready() {
    // GIVEN
    let mut service = start_fake_service(Behaviour::Cooperative).await;

    // WHEN
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");

    // THEN
    let first = service.next_received().await;
    assert!(first.binary, "Client frames should be binary");
    assert_eq!(first.body, serde_json::json!({ "OpCode": "config" }));

    let snapshot = wait_for_state(&handle, SessionState::Ready).await;
    assert_eq!(snapshot.channels, vec!["tcp"]);
    assert_eq!(snapshot.processors, vec!["Caesar"]);
    assert_eq!(
        snapshot.log.last().map(|e| e.text.as_str()),
        Some("Connection to server established.")
    );
}

/// **VALUE**: Verifies a full open / write / read / close cycle over a real socket.
///
/// **WHY THIS MATTERS**: Exercises the actor's select loop with operator actions and
/// inbound frames interleaved, which unit tests on `Session` cannot.
///
/// **BUG THIS CATCHES**: Would catch outbound messages carrying stale data, replies that
/// are never routed, or the compose buffer surviving a send.
#[tokio::test]
async fn given_ready_session_when_open_write_close_then_service_sees_each_request() {
    // GIVEN
    let mut service = start_fake_service(Behaviour::Cooperative).await;
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");
    service.next_received().await;
    wait_for_state(&handle, SessionState::Ready).await;

    // WHEN: the operator configures and opens
    handle
        .dispatch(OperatorAction::SelectChannel {
            name: "tcp".to_string(),
        })
        .await
        .expect("tcp is published");
    handle
        .dispatch(OperatorAction::SetChannelOption {
            key: "port".to_string(),
            input: "9100".to_string(),
        })
        .await
        .expect("valid port");
    handle
        .dispatch(OperatorAction::AddProcessor)
        .await
        .expect("adding a slot always works");
    handle
        .dispatch(OperatorAction::SelectProcessor {
            index: 0,
            name: "Caesar".to_string(),
        })
        .await
        .expect("Caesar is published");
    handle
        .dispatch(OperatorAction::Open)
        .await
        .expect("open is valid");

    // THEN: the service saw the edited configuration
    let open = service.next_received().await.body;
    assert_eq!(open["OpCode"], "open");
    assert_eq!(open["Processors"][0]["Type"], "Caesar");
    assert_eq!(open["Channel"]["Data"]["tcp"]["port"]["Value"], 9100);
    wait_for_state(&handle, SessionState::Open).await;

    // WHEN: a composed message is sent
    handle
        .dispatch(OperatorAction::Compose {
            text: "hello".to_string(),
        })
        .await
        .expect("compose always works");
    handle
        .dispatch(OperatorAction::SendComposed)
        .await
        .expect("send is valid while open");

    // THEN: it is acknowledged and echoed back
    assert_eq!(service.next_received().await.body["Message"], "hello");
    let snapshot = wait_until(&handle, "echoed message", |s| {
        s.log
            .iter()
            .any(|e| e.text == "Covert message received: hello")
    })
    .await;
    assert_eq!(snapshot.compose, "");
    assert!(snapshot.log.iter().any(|e| e.text == "Covert message sent."));

    // WHEN / THEN: closing returns to Ready
    handle
        .dispatch(OperatorAction::Close)
        .await
        .expect("close is valid while open");
    assert_eq!(service.next_received().await.body["OpCode"], "close");
    wait_for_state(&handle, SessionState::Ready).await;
}

/// **VALUE**: Verifies validation failures come back to the caller and send nothing.
#[tokio::test]
async fn given_ready_session_when_invalid_action_then_error_returned() {
    let mut service = start_fake_service(Behaviour::Cooperative).await;
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");
    service.next_received().await;
    wait_for_state(&handle, SessionState::Ready).await;

    let result = handle.dispatch(OperatorAction::Open).await;

    assert!(matches!(
        result,
        Err(CoreError::Session(SessionError::NoChannelSelected { .. }))
    ));
    assert_eq!(handle.snapshot().await.state, SessionState::Ready);
    assert!(service.received.try_recv().is_err(), "Nothing should be sent");
}

/// **VALUE**: Verifies the timeout policy abandons an unanswered open.
///
/// **WHY THIS MATTERS**: Without it, a service that never answers leaves the operator
/// stuck in Opening with no way to retry.
///
/// **BUG THIS CATCHES**: Would catch the timer never being armed, or firing without
/// returning the session to Ready.
#[tokio::test]
async fn given_service_ignoring_open_when_timeout_expires_then_back_to_ready() {
    // GIVEN
    let mut service = start_fake_service(Behaviour::IgnoreOpen).await;
    let handle = SessionHandle::connect(&service.url, FixedTimeout(Duration::from_millis(100)))
        .await
        .expect("Failed to connect to fake service");
    service.next_received().await;
    wait_for_state(&handle, SessionState::Ready).await;
    handle
        .dispatch(OperatorAction::SelectChannel {
            name: "tcp".to_string(),
        })
        .await
        .expect("tcp is published");

    // WHEN
    handle
        .dispatch(OperatorAction::Open)
        .await
        .expect("open is valid");

    // THEN
    let snapshot = wait_until(&handle, "open timeout", |s| {
        s.state == SessionState::Ready
            && s.log
                .iter()
                .any(|e| e.text.starts_with("[ERROR]: No open acknowledgement"))
    })
    .await;
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.text == "Stopped waiting for the open acknowledgement.")
    );
}

/// **VALUE**: Verifies a closed socket ends the session and later actions fail cleanly.
#[tokio::test]
async fn given_service_hangs_up_when_session_running_then_disconnected() {
    // GIVEN
    let service = start_fake_service(Behaviour::HangUpAfterSchema).await;
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");

    // WHEN
    let snapshot = wait_for_state(&handle, SessionState::Disconnected).await;

    // THEN
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.text.starts_with("[ERROR]: Connection to server lost"))
    );
    wait_until(&handle, "actor shutdown", |_| handle.is_closed()).await;
    assert!(handle.dispatch(OperatorAction::AddProcessor).await.is_err());
}

/// **VALUE**: Verifies an operator disconnect closes the socket.
#[tokio::test]
async fn given_ready_session_when_disconnect_then_service_sees_close() {
    let mut service = start_fake_service(Behaviour::Cooperative).await;
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");
    service.next_received().await;
    wait_for_state(&handle, SessionState::Ready).await;

    handle
        .dispatch(OperatorAction::Disconnect)
        .await
        .expect("disconnect always succeeds");

    wait_for_state(&handle, SessionState::Disconnected).await;
    let closed = tokio::time::timeout(Duration::from_secs(5), service.received.recv())
        .await
        .expect("Fake service should stop");
    assert!(closed.is_none(), "No frames after disconnect");
}

/// **VALUE**: Verifies the snapshot already reflects a frame when its event arrives.
///
/// **WHY THIS MATTERS**: The console prints new log lines when an event arrives. A stale
/// snapshot would hide an unprompted `read` until something else happened.
///
/// **BUG THIS CATCHES**: Would catch the event being broadcast before the snapshot is
/// refreshed.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_echoing_service_when_read_event_arrives_then_snapshot_has_message() {
    // GIVEN
    let mut service = start_fake_service(Behaviour::Cooperative).await;
    let handle = SessionHandle::connect(&service.url, NoTimeout)
        .await
        .expect("Failed to connect to fake service");
    service.next_received().await;
    wait_for_state(&handle, SessionState::Ready).await;
    handle
        .dispatch(OperatorAction::SelectChannel {
            name: "tcp".to_string(),
        })
        .await
        .expect("tcp is published");
    handle
        .dispatch(OperatorAction::Open)
        .await
        .expect("open is valid");
    wait_for_state(&handle, SessionState::Open).await;
    let mut events = handle.subscribe();

    for round in 0..50 {
        // WHEN
        let text = format!("ping {round}");
        handle
            .dispatch(OperatorAction::Send { text: text.clone() })
            .await
            .expect("send is valid while open");

        // THEN
        let received = loop {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("Timed out waiting for an event")
                .expect("Event stream should stay open");
            if let SessionEvent::MessageReceived { message } = event {
                break message;
            }
        };
        assert_eq!(received, text);
        let expected = format!("Covert message received: {text}");
        assert_eq!(
            handle.snapshot().await.log.last().map(|e| e.text.as_str()),
            Some(expected.as_str())
        );
    }
}

/// **VALUE**: Verifies an unanswered schema request can be repeated after its timeout.
///
/// **WHY THIS MATTERS**: The timeout only reports the silence; without a way to ask
/// again the session would sit in AwaitingSchema forever.
///
/// **BUG THIS CATCHES**: Would catch the re-request not reaching the wire, or the timer
/// not being armed again for the second request.
#[tokio::test]
async fn given_service_ignoring_first_config_when_schema_requested_again_then_ready() {
    // GIVEN
    let mut service = start_fake_service(Behaviour::IgnoreFirstConfig).await;
    let handle = SessionHandle::connect(&service.url, FixedTimeout(Duration::from_millis(100)))
        .await
        .expect("Failed to connect to fake service");
    assert_eq!(service.next_received().await.body["OpCode"], "config");

    let snapshot = wait_until(&handle, "schema timeout", |s| {
        s.log
            .iter()
            .any(|e| e.text.starts_with("[ERROR]: No config acknowledgement"))
    })
    .await;
    assert_eq!(snapshot.state, SessionState::AwaitingSchema);

    // WHEN
    handle
        .dispatch(OperatorAction::RequestSchema)
        .await
        .expect("re-request is valid while awaiting the schema");

    // THEN
    assert_eq!(service.next_received().await.body["OpCode"], "config");
    let snapshot = wait_for_state(&handle, SessionState::Ready).await;
    assert_eq!(snapshot.channels, vec!["tcp"]);
    assert!(matches!(
        handle.dispatch(OperatorAction::RequestSchema).await,
        Err(CoreError::Session(SessionError::InvalidState { .. }))
    ));
}
