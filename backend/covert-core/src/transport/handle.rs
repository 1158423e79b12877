//! The session actor and the handle operators use to reach it.

use crate::error::CoreError;
use crate::error::transport::TransportError;
use crate::registry::CatalogKind;
use crate::session::{LogEntry, PendingAck, Session, SessionEvent, SessionState};
use crate::store::ConfigStore;
use crate::transport::connection::{FrameSink, FrameStream, connect};
use crate::transport::timeout::AckTimeoutPolicy;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{RwLock, broadcast, mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use url::Url;
use uuid::Uuid;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Something the operator asked the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorAction {
    /// Ask the service for its schema again while still waiting for it.
    RequestSchema,
    SelectChannel { name: String },
    SetChannelOption { key: String, input: String },
    AddProcessor,
    SelectProcessor { index: usize, name: String },
    SetProcessorOption { index: usize, key: String, input: String },
    RemoveProcessor { index: usize },
    Compose { text: String },
    Open,
    Close,
    Send { text: String },
    SendComposed,
    AbandonPending,
    Disconnect,
}

/// Point-in-time copy of everything a renderer needs.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: SessionState,
    pub log: Vec<LogEntry>,
    /// Channel types the service advertises, sorted.
    pub channels: Vec<String>,
    /// Processor types the service advertises, sorted.
    pub processors: Vec<String>,
    pub store: ConfigStore,
    pub compose: String,
}

impl SessionSnapshot {
    fn of(session: &Session) -> Self {
        let registry = session.registry();
        Self {
            id: session.id(),
            state: session.state(),
            log: session.log().entries().to_vec(),
            channels: registry
                .names(CatalogKind::Channel)
                .map(str::to_string)
                .collect(),
            processors: registry
                .names(CatalogKind::Processor)
                .map(str::to_string)
                .collect(),
            store: session.store().clone(),
            compose: session.compose().to_string(),
        }
    }
}

struct Command {
    action: OperatorAction,
    reply: oneshot::Sender<Result<(), CoreError>>,
}

/// Cloneable handle to a running session.
///
/// All clones talk to the same actor. The actor stops when the transport is
/// lost, when the operator disconnects, or when every handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    /// Kept only to mint subscriptions; the actor owns the sender so the
    /// stream closes when it stops.
    events: Arc<broadcast::Receiver<SessionEvent>>,
}

impl SessionHandle {
    /// Connect to `url`, request the schema and start the session actor.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the socket cannot be opened, or
    /// [`TransportError::Send`] if the schema request cannot be sent.
    pub async fn connect(
        url: &Url,
        policy: impl AckTimeoutPolicy,
    ) -> Result<Self, CoreError> {
        let (sink, stream) = connect(url).await?;
        Self::start(sink, stream, policy).await
    }

    /// Start a session on an already open socket.
    pub async fn start(
        mut sink: FrameSink,
        stream: FrameStream,
        policy: impl AckTimeoutPolicy,
    ) -> Result<Self, CoreError> {
        let mut session = Session::new();
        let request = session.request_schema()?;
        sink.send(&request).await?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, events_rx) = broadcast::channel(EVENT_BUFFER);
        let snapshot = Arc::new(RwLock::new(SessionSnapshot::of(&session)));

        let actor = SessionActor {
            session,
            sink,
            stream,
            snapshot: Arc::clone(&snapshot),
            events,
            timer: AckTimer::default(),
            policy: Box::new(policy),
        };
        tokio::spawn(actor.run(command_rx));

        Ok(Self {
            command_tx,
            snapshot,
            events: Arc::new(events_rx),
        })
    }

    /// Send an action to the actor and wait for its outcome.
    ///
    /// # Errors
    ///
    /// Returns whatever the action failed with, or
    /// [`TransportError::Actor`] if the session has already ended.
    pub async fn dispatch(&self, action: OperatorAction) -> Result<(), CoreError> {
        let (reply, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command { action, reply })
            .await
            .map_err(|e| TransportError::Actor {
                message: format!("Session actor stopped: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        reply_rx.await.map_err(|e| TransportError::Actor {
            message: format!("Session actor dropped the reply: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?
    }

    /// Get the latest published snapshot (read-only).
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Receive an event for every inbound frame the session handles.
    ///
    /// The stream ends when the actor stops.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.resubscribe()
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}

/// Acknowledgement timer bookkeeping.
///
/// A timer is armed once per entry into a pending state. After it fires it
/// stays disarmed until the session leaves that state.
#[derive(Default)]
struct AckTimer {
    armed: Option<(PendingAck, Instant, Duration)>,
    tracked: Option<PendingAck>,
}

impl AckTimer {
    fn sync(&mut self, pending: Option<PendingAck>, policy: &dyn AckTimeoutPolicy) {
        if pending == self.tracked {
            return;
        }
        self.tracked = pending;
        self.armed = pending.and_then(|pending| {
            policy
                .timeout_for(pending)
                .map(|wait| (pending, Instant::now() + wait, wait))
        });
    }

    /// Forget the tracked request so the next sync arms a fresh timer.
    fn restart(&mut self) {
        self.armed = None;
        self.tracked = None;
    }

    fn deadline(&self) -> Option<Instant> {
        self.armed.map(|(_, deadline, _)| deadline)
    }

    fn fire(&mut self) -> Option<(PendingAck, Duration)> {
        self.armed.take().map(|(pending, _, wait)| (pending, wait))
    }
}

struct SessionActor {
    session: Session,
    sink: FrameSink,
    stream: FrameStream,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    events: broadcast::Sender<SessionEvent>,
    timer: AckTimer,
    policy: Box<dyn AckTimeoutPolicy>,
}

impl SessionActor {
    /// Owns the session and processes its inputs one at a time until the
    /// session is disconnected or every handle is gone.
    async fn run(mut self, mut command_rx: mpsc::Receiver<Command>) {
        let id = self.session.id();
        info!("Session {id}: actor started");
        self.timer.sync(self.session.state().pending(), self.policy.as_ref());

        loop {
            let deadline = self.timer.deadline();

            tokio::select! {
                command = command_rx.recv() => {
                    let Some(Command { action, reply }) = command else {
                        info!("Session {id}: all handles dropped, closing");
                        self.sink.close().await;
                        self.session.transport_lost("client shut down");
                        break;
                    };
                    let result = self.apply(action).await;
                    if reply.send(result).is_err() {
                        debug!("Session {id}: caller stopped waiting for a reply");
                    }
                }
                frame = self.stream.next_frame() => match frame {
                    Some(Ok(payload)) => {
                        let event = self.session.handle_frame(&payload);
                        // Subscribers read the snapshot when the event arrives.
                        self.publish().await;
                        let _ = self.events.send(event);
                    }
                    Some(Err(e)) => self.session.transport_lost(&e.to_string()),
                    None => self.session.transport_lost("connection closed by server"),
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some((pending, waited)) = self.timer.fire() {
                        self.session.ack_timed_out(pending, waited);
                    }
                }
            }

            self.timer
                .sync(self.session.state().pending(), self.policy.as_ref());
            self.publish().await;

            if self.session.state() == SessionState::Disconnected {
                break;
            }
        }

        self.publish().await;
        info!("Session {id}: actor stopped");
    }

    async fn apply(&mut self, action: OperatorAction) -> Result<(), CoreError> {
        let session = &mut self.session;

        let outbound = match action {
            OperatorAction::RequestSchema => {
                let request = session.request_schema()?;
                self.timer.restart();
                Some(request)
            }
            OperatorAction::SelectChannel { name } => {
                session.select_channel(&name)?;
                None
            }
            OperatorAction::SetChannelOption { key, input } => {
                session.set_channel_option_from_str(&key, &input)?;
                None
            }
            OperatorAction::AddProcessor => {
                session.add_processor();
                None
            }
            OperatorAction::SelectProcessor { index, name } => {
                session.select_processor(index, &name)?;
                None
            }
            OperatorAction::SetProcessorOption { index, key, input } => {
                session.set_processor_option_from_str(index, &key, &input)?;
                None
            }
            OperatorAction::RemoveProcessor { index } => {
                session.remove_processor(index)?;
                None
            }
            OperatorAction::Compose { text } => {
                session.set_compose(text);
                None
            }
            OperatorAction::Open => Some(session.open_channel()?),
            OperatorAction::Close => Some(session.close_channel()?),
            OperatorAction::Send { text } => Some(session.send_message(text)?),
            OperatorAction::SendComposed => Some(session.send_composed()?),
            OperatorAction::AbandonPending => {
                session.abandon_pending()?;
                None
            }
            OperatorAction::Disconnect => {
                self.sink.close().await;
                self.session.transport_lost("disconnected by operator");
                return Ok(());
            }
        };

        if let Some(message) = outbound
            && let Err(e) = self.sink.send(&message).await
        {
            warn!("Session {}: {e}", self.session.id());
            self.session.transport_lost(&e.to_string());
            return Err(e.into());
        }
        Ok(())
    }

    async fn publish(&self) {
        let mut snapshot_write = self.snapshot.write().await;
        *snapshot_write = SessionSnapshot::of(&self.session);
    }
}
