use async_trait::async_trait;

use crate::domain::entities::{Booking, BookingStatus, Conversation, Payment, Service};
use crate::domain::errors::ApiError;
use crate::domain::ports::ConversationApi;
use crate::interface_adapters::endpoints;
use crate::interface_adapters::http::RestClient;
use crate::interface_adapters::protocol::{
    AccountDto, AccountUpdate, BookingStatusUpdate, ConversationDto, ListParams, ListResult,
    StartConversationWithClient, VendorDashboard, VendorRegisterRequest,
};

/// Vendor-side operations: catalog management, bookings and payments.
#[derive(Clone)]
pub struct VendorService {
    rest: RestClient,
}

impl VendorService {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn register(&self, request: &VendorRegisterRequest) -> Result<AccountDto, ApiError> {
        self.rest
            .post_json(endpoints::VENDOR_REGISTER, request)
            .await
    }

    pub async fn services(&self) -> Result<Vec<Service>, ApiError> {
        self.rest.get_json(endpoints::VENDOR_SERVICES).await
    }

    pub async fn dashboard(&self) -> Result<VendorDashboard, ApiError> {
        self.rest.get_json(endpoints::VENDOR_DASHBOARD).await
    }

    pub async fn bookings(&self, params: &ListParams) -> Result<ListResult<Booking>, ApiError> {
        self.rest
            .get_json_with(endpoints::VENDOR_BOOKINGS, &params.to_query())
            .await
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.rest
            .get_json(&format!("/vendor/bookings/{booking_id}"))
            .await
    }

    /// Drives a booking through its status transitions. The backend rejects
    /// transitions out of terminal states.
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        self.rest
            .patch_json(
                &format!("/vendor/bookings/{booking_id}"),
                &BookingStatusUpdate { status },
            )
            .await
    }

    pub async fn confirm_booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.update_booking_status(booking_id, BookingStatus::Confirmed)
            .await
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.update_booking_status(booking_id, BookingStatus::Cancelled)
            .await
    }

    pub async fn complete_booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.update_booking_status(booking_id, BookingStatus::Completed)
            .await
    }

    pub async fn payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.rest.get_json(endpoints::VENDOR_PAYMENTS).await
    }

    pub async fn profile(&self) -> Result<AccountDto, ApiError> {
        self.rest.get_json(endpoints::VENDOR_ACCOUNT_PROFILE).await
    }

    pub async fn update_account(
        &self,
        vendor_id: &str,
        update: &AccountUpdate,
    ) -> Result<AccountDto, ApiError> {
        self.rest
            .patch_json(&format!("/vendor/account/{vendor_id}"), update)
            .await
    }
}

#[async_trait]
impl ConversationApi for VendorService {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let dtos: Vec<ConversationDto> =
            self.rest.get_json(endpoints::VENDOR_CONVERSATIONS).await?;
        Ok(dtos.into_iter().map(Conversation::from).collect())
    }

    async fn start_conversation(&self, counterpart_id: &str) -> Result<Conversation, ApiError> {
        let dto: ConversationDto = self
            .rest
            .post_json(
                endpoints::VENDOR_CONVERSATIONS,
                &StartConversationWithClient {
                    client_id: counterpart_id.to_string(),
                },
            )
            .await?;
        Ok(Conversation::from(dto))
    }
}
