//! Invoice submission
//!
//! Turning a cart into a sale takes two backend calls: create a pending
//! invoice, then complete it (the backend decrements stock on completion).
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Completed
//!                      │
//!                      └────────▶ Failed
//! ```
//!
//! The cart is cleared only after both calls succeed. If creation succeeds
//! and completion fails the invoice stays pending server-side, unless the
//! checkout was built with [`OrphanPolicy::Cancel`].

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use shared::Invoice;
use tracing::{debug, info, instrument, warn};

use crate::api::StoreApi;
use crate::cart::Cart;
use crate::error::{PosError, PosResult};
use crate::http::HttpClient;

/// What to do with a pending invoice whose completion failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Leave it pending for manual follow-up
    #[default]
    Leave,
    /// Send one `POST /invoices/{id}/cancel`; its failure is only logged
    Cancel,
}

/// Observable state of the last submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Completed {
        invoice_number: String,
    },
    Failed {
        message: String,
    },
}

/// Clears the in-flight flag on every exit path
///
/// A submission dropped before it finished must not stay `Submitting`.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<SubmissionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.state.lock();
            if *state == SubmissionState::Submitting {
                *state = SubmissionState::Failed {
                    message: "The submission was interrupted".to_string(),
                };
            }
        }
        self.flag.store(false, Ordering::Release);
    }
}

/// Invoice submission for one till
#[derive(Debug)]
pub struct Checkout<C: HttpClient> {
    api: StoreApi<C>,
    orphan_policy: OrphanPolicy,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl<C: HttpClient> Checkout<C> {
    pub fn new(api: StoreApi<C>) -> Self {
        Self {
            api,
            orphan_policy: OrphanPolicy::default(),
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    pub fn state(&self) -> SubmissionState {
        self.state.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the cart as a completed invoice
    ///
    /// On success the cart is cleared and the backend-persisted invoice is
    /// returned. On any failure the cart is left untouched.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn submit(&self, cart: &mut Cart) -> PosResult<Invoice> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Submission already in progress");
            return Err(PosError::SubmissionInProgress);
        }
        let _guard = InFlight {
            flag: &self.in_flight,
            state: &self.state,
        };

        if cart.is_empty() {
            return Err(PosError::EmptyCart);
        }

        *self.state.lock() = SubmissionState::Submitting;
        let result = self.create_and_complete(cart).await;

        *self.state.lock() = match &result {
            Ok(invoice) => SubmissionState::Completed {
                invoice_number: invoice.invoice_number.clone(),
            },
            Err(e) => SubmissionState::Failed {
                message: e.user_message(),
            },
        };

        if let Ok(invoice) = &result {
            cart.clear();
            info!(
                invoice_number = %invoice.invoice_number,
                total = invoice.total,
                "Invoice completed"
            );
        }
        result
    }

    async fn create_and_complete(&self, cart: &Cart) -> PosResult<Invoice> {
        let request = cart.invoice_request();
        request.validate()?;

        let invoices = self.api.invoices();
        let pending = invoices.create(&request).await?;
        debug!(invoice_id = %pending.id, "Pending invoice created");

        let completed = match invoices.complete(&pending.id).await {
            Ok(invoice) => invoice,
            Err(source) => {
                warn!(
                    invoice_id = %pending.id,
                    invoice_number = %pending.invoice_number,
                    error = %source,
                    "Invoice created but not completed"
                );
                if self.orphan_policy == OrphanPolicy::Cancel {
                    self.cancel_orphan(&pending.id).await;
                }
                return Err(PosError::CompletionFailed {
                    invoice_id: pending.id,
                    invoice_number: pending.invoice_number,
                    source,
                });
            }
        };

        if !completed.items.is_empty() {
            return Ok(completed);
        }
        match invoices.get(&completed.id).await {
            Ok(full) => Ok(full),
            Err(e) => {
                warn!(invoice_id = %completed.id, error = %e, "Could not fetch invoice items");
                Ok(completed)
            }
        }
    }

    async fn cancel_orphan(&self, invoice_id: &str) {
        match self.api.invoices().cancel(invoice_id).await {
            Ok(_) => info!(invoice_id, "Orphaned invoice cancelled"),
            Err(e) => warn!(invoice_id, error = %e, "Failed to cancel orphaned invoice"),
        }
    }
}
