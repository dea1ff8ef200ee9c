// Shared mock backend for integration tests: REST routes plus a `/ws`
// endpoint that echoes sent messages back to every connected socket, the
// way the real gateway fans messages out to conversation members.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use marketplace_client::domain::entities::{
    Booking, BookingStatus, Participant, Payment, PaymentStatus, Role,
};
use marketplace_client::interface_adapters::protocol::{
    AccountDto, ClientDashboard, ClientEvent, ConversationDto, CreateBookingRequest,
    CreateBookingResponse, InitiatePaymentResponse, LoginRequest, LoginResponse, MessageDto,
    ServerEvent, StartConversationWithVendor, VerifyPaymentRequest,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// REST base URL (including the /api suffix) for the shared mock backend.
pub fn ensure_server() -> String {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // An OS thread so the server outlives individual test runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                axum::serve(listener, mock_app())
                    .await
                    .expect("mock backend failed");
            });
        });
        wait_for_server(published_url);
    });

    let root = SERVER_URL.get().expect("server url should be initialized");
    format!("{root}/api")
}

fn wait_for_server(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("mock backend did not become ready in time");
}

#[derive(Clone)]
struct MockState {
    inner: Arc<Mutex<Inner>>,
    // Serialized ServerEvent frames fanned out to every connected socket.
    ws_tx: broadcast::Sender<String>,
}

struct Inner {
    conversations: Vec<ConversationDto>,
    start_calls: u32,
    mark_read_calls: u32,
    verify_calls: HashMap<String, u32>,
}

fn participant(user_id: &str, role: Role) -> Participant {
    Participant {
        id: format!("part-{user_id}"),
        user_id: user_id.to_string(),
        role,
        display_name: user_id.to_string(),
    }
}

fn mock_app() -> Router {
    let (ws_tx, _) = broadcast::channel(64);
    // One conversation with an unread vendor message is always present.
    let seeded = ConversationDto {
        id: "conv-seeded".to_string(),
        participants: vec![
            participant("user-1", Role::Client),
            participant("vendor-2", Role::Vendor),
        ],
        messages: vec![MessageDto {
            id: "msg-seeded".to_string(),
            conversation_id: "conv-seeded".to_string(),
            sender_id: "vendor-2".to_string(),
            recipient_id: "user-1".to_string(),
            content: "We have your date available".to_string(),
            created_at: Utc::now() - chrono::Duration::hours(1),
            read: false,
            client_ref: None,
        }],
        updated_at: Some(Utc::now() - chrono::Duration::hours(1)),
    };
    let state = MockState {
        inner: Arc::new(Mutex::new(Inner {
            conversations: vec![seeded],
            start_calls: 0,
            mark_read_calls: 0,
            verify_calls: HashMap::new(),
        })),
        ws_tx,
    };

    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/echo/auth", get(echo_auth))
        .route("/api/client/dashboard", get(client_dashboard))
        .route("/api/client/conversations", get(client_conversations))
        .route("/api/client/conversation", post(start_conversation))
        .route("/api/client/bookings", post(create_booking))
        .route("/api/client/payment/initiate", post(initiate_payment))
        .route("/api/client/payment/verify", post(verify_payment))
        .route("/api/_test/counters", get(counters))
        .route("/api/_test/verify_count/{tx_ref}", get(verify_count))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn authorized(headers: &HeaderMap) -> bool {
    matches!(
        bearer(headers).as_deref(),
        Some("token-client") | Some("token-vendor")
    )
}

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "message": "unauthorized" })),
    )
}

async fn login(Json(body): Json<LoginRequest>) -> impl IntoResponse {
    if body.password == "wrong" {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "invalid credentials" })),
        )
            .into_response();
    }
    Json(LoginResponse {
        token: "token-client".to_string(),
        user: AccountDto {
            id: "user-1".to_string(),
            role: Role::Client,
            email: Some(body.email),
            display_name: Some("Abebe".to_string()),
        },
    })
    .into_response()
}

async fn echo_auth(headers: HeaderMap) -> impl IntoResponse {
    Json(serde_json::json!({ "hasAuth": bearer(&headers).is_some() }))
}

async fn client_dashboard(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    Json(ClientDashboard {
        total_payment_amount: 2_500.0,
        payments: Vec::new(),
        bookings: Vec::new(),
    })
    .into_response()
}

async fn client_conversations(
    headers: HeaderMap,
    State(state): State<MockState>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let inner = state.inner.lock().expect("mock state poisoned");
    Json(inner.conversations.clone()).into_response()
}

async fn start_conversation(
    headers: HeaderMap,
    State(state): State<MockState>,
    Json(body): Json<StartConversationWithVendor>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let mut inner = state.inner.lock().expect("mock state poisoned");
    inner.start_calls += 1;
    let conversation = ConversationDto {
        id: format!("conv-{}", body.vendor_id),
        participants: vec![
            participant("user-1", Role::Client),
            participant(&body.vendor_id, Role::Vendor),
        ],
        messages: Vec::new(),
        updated_at: Some(Utc::now()),
    };
    inner.conversations.push(conversation.clone());
    Json(conversation).into_response()
}

async fn create_booking(
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let booking_id = if body.service_id == "svc-failpay" {
        "booking-fail".to_string()
    } else {
        format!("booking-{}", uuid::Uuid::new_v4())
    };
    Json(CreateBookingResponse {
        booking: Booking {
            id: booking_id,
            service_id: body.service_id,
            service_tier_price_id: Some(body.service_tier_price_id),
            selected_tier: body.selected_tier,
            event_date: body.event_date,
            location: body.location,
            attendees: body.attendees,
            special_requests: body.special_requests,
            status: BookingStatus::Pending,
            vendor_id: "vendor-1".to_string(),
            tier: None,
            amount: None,
        },
    })
    .into_response()
}

async fn initiate_payment(
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let booking_id = body["bookingId"].as_str().unwrap_or_default().to_string();
    if booking_id.contains("fail") {
        return (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "message": "payment gateway unavailable" })),
        )
            .into_response();
    }
    Json(InitiatePaymentResponse {
        checkout_url: format!("https://checkout.chapa.test/{booking_id}"),
    })
    .into_response()
}

async fn verify_payment(
    headers: HeaderMap,
    State(state): State<MockState>,
    Json(body): Json<VerifyPaymentRequest>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let mut inner = state.inner.lock().expect("mock state poisoned");
    let count = inner.verify_calls.entry(body.tx_ref.clone()).or_insert(0);
    *count += 1;
    // Failing refs resolve immediately; everything else needs three calls.
    let status = if body.tx_ref.contains("fail") {
        PaymentStatus::Failed
    } else if *count >= 3 {
        PaymentStatus::Completed
    } else {
        PaymentStatus::Pending
    };
    Json(Payment {
        id: body.payment_id,
        booking_id: "booking-1".to_string(),
        vendor_id: "vendor-1".to_string(),
        user_id: "user-1".to_string(),
        amount: 2_500.0,
        status,
        tx_ref: body.tx_ref,
    })
    .into_response()
}

async fn counters(State(state): State<MockState>) -> impl IntoResponse {
    let inner = state.inner.lock().expect("mock state poisoned");
    Json(serde_json::json!({
        "startCalls": inner.start_calls,
        "markReadCalls": inner.mark_read_calls,
    }))
}

async fn verify_count(
    State(state): State<MockState>,
    Path(tx_ref): Path<String>,
) -> impl IntoResponse {
    let inner = state.inner.lock().expect("mock state poisoned");
    Json(serde_json::json!(inner.verify_calls.get(&tx_ref).copied().unwrap_or(0)))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<MockState>,
) -> impl IntoResponse {
    let sender_id = match params.get("token").map(String::as_str) {
        Some("token-client") => "user-1".to_string(),
        Some("token-vendor") => "vendor-2".to_string(),
        _ => "anon".to_string(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, sender_id))
}

async fn handle_socket(socket: WebSocket, state: MockState, sender_id: String) {
    let (mut sink, mut source) = socket.split();
    let mut fanout_rx = state.ws_tx.subscribe();

    loop {
        tokio::select! {
            frame = source.next() => {
                let Some(Ok(frame)) = frame else { break };
                let WsMessage::Text(text) = frame else { continue };
                let Ok(event) = serde_json::from_str::<ClientEvent>(&text) else { continue };
                match event {
                    ClientEvent::SendMessage { conversation_id, content, to_user_id, client_ref } => {
                        let echo = ServerEvent::ReceiveMessage(MessageDto {
                            id: format!("srv-{}", uuid::Uuid::new_v4()),
                            conversation_id,
                            sender_id: sender_id.clone(),
                            recipient_id: to_user_id,
                            content,
                            created_at: Utc::now(),
                            read: false,
                            client_ref: Some(client_ref),
                        });
                        let frame = serde_json::to_string(&echo).expect("serialize echo");
                        let _ = state.ws_tx.send(frame);
                    }
                    ClientEvent::MarkRead { .. } => {
                        let mut inner = state.inner.lock().expect("mock state poisoned");
                        inner.mark_read_calls += 1;
                    }
                    ClientEvent::JoinConversation { .. } => {}
                }
            }
            fanned = fanout_rx.recv() => {
                match fanned {
                    Ok(frame) => {
                        if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
