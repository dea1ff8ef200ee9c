// Payment status resolution for the gateway return route.
//
// The gateway redirects back with `tx_ref` and `payment_id`; verification
// runs once immediately and then on a fixed cadence only while the payment
// stays PENDING. Polling stops on the first terminal status, on any
// verification error, and on cancellation (screen unmount).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::entities::{Payment, PaymentStatus};
use crate::domain::errors::BookingError;
use crate::domain::ports::{BookingApi, Notifier};

pub struct PaymentStatusPoller<A, N>
where
    A: BookingApi,
    N: Notifier,
{
    pub api: A,
    pub notifier: N,
    pub interval: Duration,
    pub cancel: Arc<Notify>,
}

impl<A, N> PaymentStatusPoller<A, N>
where
    A: BookingApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N, interval: Duration) -> Self {
        Self {
            api,
            notifier,
            interval,
            cancel: Arc::new(Notify::new()),
        }
    }

    /// Handle for the owning screen to stop the poll loop on unmount.
    pub fn cancel_handle(&self) -> Arc<Notify> {
        self.cancel.clone()
    }

    /// Resolves the payment status, polling while it stays PENDING. Returns
    /// the last observed payment; an error is returned only when the very
    /// first verification fails and there is nothing to show.
    pub async fn resolve(&self, tx_ref: &str, payment_id: &str) -> Result<Payment, BookingError> {
        let mut payment = match self.api.verify_payment(tx_ref, payment_id).await {
            Ok(payment) => payment,
            Err(err) => {
                warn!(error = %err, tx_ref, "initial payment verification failed");
                self.notifier.error("Failed to verify payment status");
                return Err(BookingError::Payment(err));
            }
        };
        self.announce(&payment);

        while payment.status == PaymentStatus::Pending {
            tokio::select! {
                _ = self.cancel.notified() => {
                    debug!(tx_ref, "payment status polling cancelled");
                    return Ok(payment);
                }
                _ = sleep(self.interval) => {}
            }

            match self.api.verify_payment(tx_ref, payment_id).await {
                Ok(next) => {
                    let became_terminal = next.status.is_terminal();
                    payment = next;
                    if became_terminal {
                        self.announce(&payment);
                    }
                }
                Err(err) => {
                    // Fail-safe: never keep looping on verification errors.
                    warn!(error = %err, tx_ref, "payment verification failed; polling stopped");
                    break;
                }
            }
        }

        Ok(payment)
    }

    fn announce(&self, payment: &Payment) {
        match payment.status {
            PaymentStatus::Completed => self.notifier.success("Payment completed successfully!"),
            PaymentStatus::Failed => self.notifier.error("Payment failed. Please try again."),
            PaymentStatus::Pending => self.notifier.info("Payment is still processing."),
        }
    }
}
