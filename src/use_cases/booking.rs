// Booking submission pipeline: validate, create the booking, initiate the
// payment, then hand the page over to the external checkout.
//
// The pipeline is linear with no branching back. A booking that exists when
// payment initiation fails is not rolled back; the user is notified and
// moved to the bookings list after a short delay so they are not stranded.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::entities::{Booking, BookingDraft, BookingSubmission, PaymentRequest, Service};
use crate::domain::errors::BookingError;
use crate::domain::ports::{BookingApi, Navigator, Notifier};
use crate::use_cases::session::SessionVault;

pub struct BookingFlow<A, N, V>
where
    A: BookingApi,
    N: Notifier,
    V: Navigator,
{
    pub api: A,
    pub notifier: N,
    pub navigator: V,
    pub vault: SessionVault,
    // Safe screen for the compensating redirect.
    pub bookings_route: String,
    pub failure_redirect_delay: Duration,
}

impl<A, N, V> BookingFlow<A, N, V>
where
    A: BookingApi,
    N: Notifier,
    V: Navigator,
{
    /// Runs the full pipeline and returns the checkout URL on success. The
    /// caller's submit action should stay disabled while
    /// `draft.is_submittable()` is false; an unsubmittable draft is rejected
    /// here before any network call.
    pub async fn execute(
        &self,
        draft: &BookingDraft,
        service: &Service,
    ) -> Result<String, BookingError> {
        let submission = draft.submission().ok_or(BookingError::IncompleteDraft)?;

        let booking = match self.api.create_booking(&submission).await {
            Ok(booking) => booking,
            Err(err) => {
                warn!(error = %err, service_id = %submission.service_id, "booking creation failed");
                let text = err
                    .upstream_message()
                    .unwrap_or("Failed to book service. Please try again.")
                    .to_string();
                self.notifier.error(&text);
                return Err(BookingError::Booking(err));
            }
        };
        info!(booking_id = %booking.id, service_id = %booking.service_id, "booking created");
        self.notifier.success("Service booked successfully!");

        let Some(session) = self.vault.get() else {
            // The booking exists but the payment payload needs the session
            // user; compensate the same way as an initiation failure.
            warn!(booking_id = %booking.id, "no session available for payment initiation");
            self.compensate("Failed to process payment. Redirecting to bookings page.")
                .await;
            return Err(BookingError::MissingSession);
        };

        let request = PaymentRequest {
            amount: payment_amount(&booking, &submission, service),
            vendor_id: if booking.vendor_id.is_empty() {
                service.vendor_id.clone()
            } else {
                booking.vendor_id.clone()
            },
            booking_id: booking.id.clone(),
            user_id: session.user_id,
        };

        match self.api.initiate_payment(&request).await {
            Ok(checkout_url) => {
                self.notifier.info("Redirecting to payment page...");
                // Terminal for this page lifecycle; the gateway redirects
                // back to the status route.
                self.navigator.assign(&checkout_url);
                Ok(checkout_url)
            }
            Err(err) => {
                warn!(error = %err, booking_id = %booking.id, "payment initiation failed");
                let text = err
                    .upstream_message()
                    .unwrap_or("Failed to process payment. Redirecting to bookings page.")
                    .to_string();
                self.compensate(&text).await;
                Err(BookingError::Payment(err))
            }
        }
    }

    async fn compensate(&self, message: &str) {
        self.notifier.error(message);
        // Let the notification land before moving the user on.
        sleep(self.failure_redirect_delay).await;
        self.navigator.assign(&self.bookings_route);
    }
}

// Selected tier price, falling back to the flat booking amount, falling
// back to the service base price.
fn payment_amount(booking: &Booking, submission: &BookingSubmission, service: &Service) -> f64 {
    booking
        .tier
        .as_ref()
        .map(|tier| tier.price)
        .or_else(|| {
            service
                .tier(&submission.service_tier_price_id)
                .map(|tier| tier.price)
        })
        .or(booking.amount)
        .unwrap_or(service.base_price)
}
