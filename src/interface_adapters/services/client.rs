use async_trait::async_trait;

use crate::domain::entities::{
    Booking, BookingSubmission, Conversation, Payment, PaymentRequest, Service,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{BookingApi, ConversationApi};
use crate::interface_adapters::endpoints;
use crate::interface_adapters::http::RestClient;
use crate::interface_adapters::protocol::{
    AccountDto, AccountUpdate, ClientDashboard, ConversationDto, CreateBookingRequest,
    CreateBookingResponse, InitiatePaymentResponse, ListParams, ListResult,
    StartConversationWithVendor, VerifyPaymentRequest,
};

/// Client-side (event couple) operations.
#[derive(Clone)]
pub struct ClientService {
    rest: RestClient,
}

impl ClientService {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn dashboard(&self) -> Result<ClientDashboard, ApiError> {
        self.rest.get_json(endpoints::CLIENT_DASHBOARD).await
    }

    pub async fn bookings(&self, params: &ListParams) -> Result<ListResult<Booking>, ApiError> {
        self.rest
            .get_json_with(endpoints::CLIENT_BOOKINGS, &params.to_query())
            .await
    }

    pub async fn payments(&self, params: &ListParams) -> Result<ListResult<Payment>, ApiError> {
        self.rest
            .get_json_with(endpoints::CLIENT_PAYMENTS, &params.to_query())
            .await
    }

    pub async fn services_catalog(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Service>, ApiError> {
        self.rest
            .get_json_with(endpoints::CLIENT_SERVICES, &params.to_query())
            .await
    }

    pub async fn profile(&self) -> Result<AccountDto, ApiError> {
        self.rest.get_json(endpoints::CLIENT_ACCOUNT_PROFILE).await
    }

    pub async fn update_account(
        &self,
        user_id: &str,
        update: &AccountUpdate,
    ) -> Result<AccountDto, ApiError> {
        self.rest
            .patch_json(&format!("/client/account/{user_id}"), update)
            .await
    }
}

#[async_trait]
impl ConversationApi for ClientService {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let dtos: Vec<ConversationDto> =
            self.rest.get_json(endpoints::CLIENT_CONVERSATIONS).await?;
        Ok(dtos.into_iter().map(Conversation::from).collect())
    }

    async fn start_conversation(&self, counterpart_id: &str) -> Result<Conversation, ApiError> {
        let dto: ConversationDto = self
            .rest
            .post_json(
                endpoints::CLIENT_START_CONVERSATION,
                &StartConversationWithVendor {
                    vendor_id: counterpart_id.to_string(),
                },
            )
            .await?;
        Ok(Conversation::from(dto))
    }
}

#[async_trait]
impl BookingApi for ClientService {
    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError> {
        let response: CreateBookingResponse = self
            .rest
            .post_json(
                endpoints::CLIENT_BOOKINGS,
                &CreateBookingRequest::from(submission),
            )
            .await?;
        Ok(response.booking)
    }

    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<String, ApiError> {
        let response: InitiatePaymentResponse = self
            .rest
            .post_json(endpoints::CLIENT_PAYMENT_INITIATE, request)
            .await?;
        Ok(response.checkout_url)
    }

    async fn verify_payment(&self, tx_ref: &str, payment_id: &str) -> Result<Payment, ApiError> {
        self.rest
            .post_json(
                endpoints::CLIENT_PAYMENT_VERIFY,
                &VerifyPaymentRequest {
                    tx_ref: tx_ref.to_string(),
                    payment_id: payment_id.to_string(),
                },
            )
            .await
    }
}
