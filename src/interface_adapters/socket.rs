// Realtime channel client.
//
// The channel speaks JSON events over a WebSocket to the API host (REST base
// URL minus its `/api` suffix). A writer task drains store commands into the
// socket and a reader task forwards inbound messages; both stop on shutdown,
// on socket errors, or when their peer channel closes. Reconnection is not
// handled here; connection errors surface once through the notifier.

use std::fmt;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Notify, mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::entities::{Message, Role};
use crate::domain::ports::{Clock, ConversationApi, Notifier};
use crate::frameworks::config;
use crate::interface_adapters::protocol::{ClientEvent, ServerEvent};
use crate::use_cases::conversations::{ChannelCommand, ConversationStore};

/// Connection lifecycle as observed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug)]
pub enum ChannelError {
    InvalidUrl(String),
    Connect(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::InvalidUrl(err) => write!(f, "invalid realtime url: {err}"),
            ChannelError::Connect(err) => write!(f, "realtime connect failed: {err}"),
        }
    }
}

impl std::error::Error for ChannelError {}

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    // REST base URL; the realtime endpoint is derived from it.
    pub api_url: String,
    pub token: String,
    // Vendor sessions announce their role in the handshake.
    pub role: Option<Role>,
}

/// Live channel handles: command sender, inbound message receiver and the
/// connection state stream.
pub struct RealtimeChannel {
    pub commands: mpsc::Sender<ChannelCommand>,
    pub inbound: mpsc::Receiver<Message>,
    state_rx: watch::Receiver<ChannelState>,
    shutdown: Arc<Notify>,
}

impl RealtimeChannel {
    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    pub fn state_stream(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Stops the reader and writer tasks; used on unmount.
    pub fn disconnect(&self) {
        self.shutdown.notify_waiters();
    }
}

/// Derives the realtime endpoint: API root minus the `/api` suffix, `/ws`
/// path, token and optional role as query parameters.
pub fn realtime_url(api_url: &str, token: &str, role: Option<Role>) -> Result<Url, ChannelError> {
    let root = api_url.trim_end_matches('/');
    let root = root.strip_suffix("/api").unwrap_or(root);
    let mut url = Url::parse(root).map_err(|err| ChannelError::InvalidUrl(err.to_string()))?;

    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| ChannelError::InvalidUrl(format!("unsupported scheme in {root}")))?;
    url.set_path("/ws");
    url.query_pairs_mut().append_pair("token", token);
    if let Some(role) = role {
        url.query_pairs_mut().append_pair("role", role.as_str());
    }
    Ok(url)
}

/// Connects and spawns the reader/writer tasks.
pub async fn connect(
    config: &RealtimeConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<RealtimeChannel, ChannelError> {
    let url = realtime_url(&config.api_url, &config.token, config.role)?;
    let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
    // The URL carries the token, so log only the host.
    debug!(host = url.host_str().unwrap_or(""), "connecting realtime channel");

    let (stream, _response) = match connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(err) => {
            let _ = state_tx.send(ChannelState::Disconnected);
            notifier.error(&format!("Chat connection error: {err}"));
            return Err(ChannelError::Connect(err.to_string()));
        }
    };
    let _ = state_tx.send(ChannelState::Connected);
    info!("realtime channel connected");

    let (mut sink, mut source) = stream.split();
    let (command_tx, mut command_rx) =
        mpsc::channel::<ChannelCommand>(config::COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel::<Message>(config::EVENT_CHANNEL_CAPACITY);
    let shutdown = Arc::new(Notify::new());

    let writer_shutdown = shutdown.clone();
    tokio::spawn(async move {
        loop {
            let command = tokio::select! {
                _ = writer_shutdown.notified() => break,
                command = command_rx.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };
            let event = ClientEvent::from(command);
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    error!(error = %err, "failed to serialize channel event");
                    continue;
                }
            };
            if let Err(err) = sink.send(WsMessage::Text(text.into())).await {
                warn!(error = %err, "realtime send failed; writer exiting");
                break;
            }
        }
        let _ = sink.close().await;
    });

    let reader_shutdown = shutdown.clone();
    let reader_notifier = notifier;
    tokio::spawn(async move {
        loop {
            let incoming = tokio::select! {
                _ = reader_shutdown.notified() => break,
                incoming = source.next() => incoming,
            };
            match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::ReceiveMessage(dto)) => {
                            // Receiver gone means the owning screen unmounted.
                            if event_tx.send(Message::from(dto)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, bytes = text.len(), "unparsable channel event")
                        }
                    }
                }
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {}
                Some(Ok(WsMessage::Close(_))) => {
                    info!("realtime channel closed by server");
                    break;
                }
                Some(Ok(_)) => {
                    warn!("binary frames not supported on the realtime channel");
                }
                Some(Err(err)) => {
                    warn!(error = %err, "realtime recv error");
                    reader_notifier.error(&format!("Chat connection error: {err}"));
                    break;
                }
                None => {
                    info!("realtime channel ended");
                    break;
                }
            }
        }
        let _ = state_tx.send(ChannelState::Disconnected);
    });

    Ok(RealtimeChannel {
        commands: command_tx,
        inbound: event_rx,
        state_rx,
        shutdown,
    })
}

/// Forwards inbound channel messages into a shared conversation store until
/// the channel ends or `cancel` fires.
pub fn spawn_event_pump<A, N, C>(
    store: Arc<tokio::sync::Mutex<ConversationStore<A, N, C>>>,
    mut inbound: mpsc::Receiver<Message>,
    cancel: Arc<Notify>,
) -> tokio::task::JoinHandle<()>
where
    A: ConversationApi + 'static,
    N: Notifier + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                _ = cancel.notified() => break,
                message = inbound.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };
            store.lock().await.handle_incoming(message);
        }
    })
}
