use crate::domain::entities::Booking;
use crate::domain::errors::ApiError;
use crate::interface_adapters::endpoints;
use crate::interface_adapters::http::RestClient;
use crate::interface_adapters::protocol::{
    EventSummary, ListParams, ListResult, Notification, UserStats,
};

/// Shared dashboard widgets: stats, upcoming events and notifications.
#[derive(Clone)]
pub struct DashboardService {
    rest: RestClient,
}

impl DashboardService {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn user_stats(&self) -> Result<UserStats, ApiError> {
        self.rest.get_json(endpoints::DASHBOARD_STATS).await
    }

    pub async fn bookings(&self, params: &ListParams) -> Result<ListResult<Booking>, ApiError> {
        self.rest
            .get_json_with(endpoints::DASHBOARD_BOOKINGS, &params.to_query())
            .await
    }

    pub async fn events(&self, params: &ListParams) -> Result<ListResult<EventSummary>, ApiError> {
        self.rest
            .get_json_with(endpoints::DASHBOARD_EVENTS, &params.to_query())
            .await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.rest.get_json(endpoints::DASHBOARD_NOTIFICATIONS).await
    }
}
