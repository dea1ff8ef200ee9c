// Wire DTOs and conversions for the marketplace REST API and the realtime
// channel. Internal domain types never cross the wire directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Booking, BookingStatus, BookingSubmission, Conversation, Message, Participant, Payment, Role,
    TierLevel,
};
use crate::use_cases::conversations::ChannelCommand;

// ---- realtime channel ----

/// Events sent to the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinConversation { conversation_id: String },
    #[serde(rename_all = "camelCase")]
    SendMessage {
        conversation_id: String,
        content: String,
        to_user_id: String,
        client_ref: String,
    },
    #[serde(rename = "markAsRead", rename_all = "camelCase")]
    MarkRead { message_id: String },
}

impl From<ChannelCommand> for ClientEvent {
    fn from(command: ChannelCommand) -> Self {
        match command {
            ChannelCommand::JoinConversation { conversation_id } => {
                ClientEvent::JoinConversation { conversation_id }
            }
            ChannelCommand::SendMessage {
                conversation_id,
                content,
                to_user_id,
                client_ref,
            } => ClientEvent::SendMessage {
                conversation_id,
                content,
                to_user_id,
                client_ref,
            },
            ChannelCommand::MarkRead { message_id } => ClientEvent::MarkRead { message_id },
        }
    }
}

/// Events received from the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    ReceiveMessage(MessageDto),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    // Correlation id echoed back for optimistic-send reconciliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ref: Option<String>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            conversation_id: dto.conversation_id,
            sender_id: dto.sender_id,
            recipient_id: dto.recipient_id,
            content: dto.content,
            created_at: dto.created_at,
            read: dto.read,
            client_ref: dto.client_ref,
            optimistic: false,
        }
    }
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            conversation_id: message.conversation_id.clone(),
            sender_id: message.sender_id.clone(),
            recipient_id: message.recipient_id.clone(),
            content: message.content.clone(),
            created_at: message.created_at,
            read: message.read,
            client_ref: message.client_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    pub id: String,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let messages: Vec<Message> = dto.messages.into_iter().map(Message::from).collect();
        // Newest message wins; empty conversations fall back to the server
        // timestamp so they still sort deterministically.
        let last_activity = messages
            .iter()
            .map(|m| m.created_at)
            .max()
            .or(dto.updated_at)
            .unwrap_or(DateTime::UNIX_EPOCH);
        Self {
            id: dto.id,
            participants: dto.participants,
            messages,
            // Recomputed by the conversation store, which knows the session
            // user.
            unread_count: 0,
            last_activity,
        }
    }
}

// ---- auth ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRegisterRequest {
    pub business_name: String,
    pub email: String,
    pub password: String,
}

/// Partial account update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ---- bookings and payments ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub service_tier_price_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tier: Option<TierLevel>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub attendees: u32,
    pub special_requests: String,
}

impl From<&BookingSubmission> for CreateBookingRequest {
    fn from(submission: &BookingSubmission) -> Self {
        Self {
            service_id: submission.service_id.clone(),
            service_tier_price_id: submission.service_tier_price_id.clone(),
            selected_tier: submission.selected_tier,
            event_date: submission.event_date,
            location: submission.location.clone(),
            attendees: submission.attendees,
            special_requests: submission.special_requests.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking: Booking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentResponse {
    pub checkout_url: String,
}

/// Verification payload; `tx_ref` keeps the gateway's snake_case spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub tx_ref: String,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

// ---- conversations ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationWithVendor {
    pub vendor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationWithClient {
    pub client_id: String,
}

// ---- pagination ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Canonical list pagination: `page`/`limit` with optional `sort`/`order`.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl ListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            sort: None,
            order: None,
        }
    }

    pub fn first_page() -> Self {
        Self::page(1, 10)
    }

    pub fn sorted(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

// ---- dashboards ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    #[serde(default)]
    pub total_payment_amount: f64,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDashboard {
    #[serde(default)]
    pub total_services: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub pending_bookings: u32,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub recent_bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub upcoming_events: u32,
    #[serde(default)]
    pub unread_notifications: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_serializing_channel_events_then_wire_names_are_camel_case() {
        let join = serde_json::to_value(ClientEvent::JoinConversation {
            conversation_id: "conv-1".to_string(),
        })
        .expect("serialize join");
        assert_eq!(join["type"], "joinConversation");
        assert_eq!(join["data"]["conversationId"], "conv-1");

        let mark = serde_json::to_value(ClientEvent::MarkRead {
            message_id: "msg-1".to_string(),
        })
        .expect("serialize mark");
        assert_eq!(mark["type"], "markAsRead");
        assert_eq!(mark["data"]["messageId"], "msg-1");
    }

    #[test]
    fn when_converting_a_conversation_dto_then_activity_follows_the_newest_message() {
        let early = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let late = DateTime::from_timestamp(1_700_000_600, 0).expect("timestamp");
        let dto = ConversationDto {
            id: "conv-1".to_string(),
            participants: Vec::new(),
            messages: vec![
                MessageDto {
                    id: "m1".to_string(),
                    conversation_id: "conv-1".to_string(),
                    sender_id: "a".to_string(),
                    recipient_id: "b".to_string(),
                    content: "first".to_string(),
                    created_at: late,
                    read: false,
                    client_ref: None,
                },
                MessageDto {
                    id: "m2".to_string(),
                    conversation_id: "conv-1".to_string(),
                    sender_id: "b".to_string(),
                    recipient_id: "a".to_string(),
                    content: "second".to_string(),
                    created_at: early,
                    read: true,
                    client_ref: None,
                },
            ],
            updated_at: Some(early),
        };

        let conversation = Conversation::from(dto);

        assert_eq!(conversation.last_activity, late);
        assert_eq!(conversation.messages.len(), 2);
        assert!(!conversation.messages[0].optimistic);
    }

    #[test]
    fn when_building_list_queries_then_only_set_fields_appear() {
        let plain = ListParams::page(2, 25).to_query();
        assert_eq!(
            plain,
            vec![("page", "2".to_string()), ("limit", "25".to_string())]
        );

        let sorted = ListParams::page(1, 10)
            .sorted("createdAt", SortOrder::Desc)
            .to_query();
        assert!(sorted.contains(&("sort", "createdAt".to_string())));
        assert!(sorted.contains(&("order", "desc".to_string())));
    }

    #[test]
    fn when_serializing_verify_requests_then_gateway_field_names_are_kept() {
        let value = serde_json::to_value(VerifyPaymentRequest {
            tx_ref: "tx-1".to_string(),
            payment_id: "pay-1".to_string(),
        })
        .expect("serialize verify");
        assert_eq!(value["tx_ref"], "tx-1");
        assert_eq!(value["paymentId"], "pay-1");
    }
}
