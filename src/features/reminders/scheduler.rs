//! # Reminder Scheduler
//!
//! Background loop that wakes on every wall-clock minute boundary, reloads the
//! store, resolves the due set and hands each due reminder to the notifier.
//! One reminder failing (or hanging past the delivery timeout) never stops the
//! rest of the sweep, and a store that cannot be read only costs that minute.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Weekly recurring reminders from the JSON store, injected clock
//! - 1.0.0: Initial one-shot reminder polling

use crate::core::{DeliveryError, StoreError};
use crate::features::reminders::model::MinuteOfWeek;
use crate::features::reminders::notifier::{DeliveryHandle, Notifier};
use crate::features::reminders::resolver::{log_invalid, resolve_due_with_errors, DueReminder};
use crate::features::reminders::store::ReminderStore;
use chrono::{NaiveDateTime, Timelike};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

/// Default bound on a single delivery
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Host local time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Counts for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
    pub invalid: usize,
}

pub struct ReminderScheduler {
    store: ReminderStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    delivery_timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(store: ReminderStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            clock: Arc::new(SystemClock),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delivery_timeout(mut self, delivery_timeout: Duration) -> Self {
        self.delivery_timeout = delivery_timeout;
        self
    }

    /// Time left until the next minute boundary: `60 - current second`
    pub fn delay_until_next_minute(now: &NaiveDateTime) -> Duration {
        Duration::from_secs(u64::from(60 - now.second().min(59)))
    }

    /// Sweep the current minute according to the scheduler's clock
    pub async fn sweep(&self) -> Result<SweepReport, StoreError> {
        let now = self.clock.now();
        self.sweep_at(MinuteOfWeek::from_datetime(&now)).await
    }

    /// Load the store and deliver every reminder due at `minute`
    pub async fn sweep_at(&self, minute: MinuteOfWeek) -> Result<SweepReport, StoreError> {
        let dataset = self.store.load().await?;
        let resolution = resolve_due_with_errors(minute, &dataset);

        log_invalid(&resolution.invalid);

        let mut report = SweepReport {
            due: resolution.due.len(),
            invalid: resolution.invalid.len(),
            ..SweepReport::default()
        };

        for due in &resolution.due {
            match self.dispatch(due).await {
                Ok(handle) => {
                    debug!(
                        "Reminder #{} for user {} sent as message {} in channel {}",
                        due.index, due.owner_id, handle.message_id, handle.channel_id
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to deliver reminder '{}' for user {}: {e}",
                        due.reminder.title(),
                        due.owner_id
                    );
                    report.failed += 1;
                }
            }
        }

        if report.due > 0 || report.invalid > 0 {
            info!(
                "⏰ Sweep {minute}: {} due, {} delivered, {} failed, {} invalid",
                report.due, report.delivered, report.failed, report.invalid
            );
        } else {
            debug!("Sweep {minute}: nothing due");
        }

        Ok(report)
    }

    async fn dispatch(&self, due: &DueReminder) -> Result<DeliveryHandle, DeliveryError> {
        let reminder = &due.reminder;
        let delivery = self.notifier.deliver(
            reminder.channel_id(),
            &due.owner_id,
            reminder.title(),
            reminder.checklist(),
        );

        match timeout(self.delivery_timeout, delivery).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.delivery_timeout)),
        }
    }

    /// Run sweeps until `shutdown` flips to `true` or its sender is dropped
    ///
    /// The stop signal is only observed while sleeping, so a sweep in progress
    /// always finishes its dispatch loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("⏰ Reminder scheduler started");

        while !*shutdown.borrow() {
            if let Err(e) = self.sweep().await {
                error!("Reminder sweep skipped: {e}");
            }

            let wait = Self::delay_until_next_minute(&self.clock.now());
            if sleep_or_shutdown(wait, &mut shutdown).await {
                break;
            }
        }

        info!("Reminder scheduler stopped");
    }
}

/// Returns `true` when shutdown was requested before `wait` elapsed
async fn sleep_or_shutdown(wait: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(wait);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
