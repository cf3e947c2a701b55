//! # Scheduler Lifecycle
//!
//! Owns the running scheduler task. There is at most one per process: a
//! second start is refused. A stopped loop is terminal, but the controller
//! can spawn a fresh one afterwards.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0

use crate::core::LifecycleError;
use crate::features::reminders::scheduler::ReminderScheduler;
use log::{info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started
    Idle,
    Running,
    /// Cancelled, or the loop task ended
    Stopped,
}

enum Slot {
    Idle,
    Running(SchedulerHandle),
    Stopped,
}

/// A spawned scheduler loop and the signal that stops it
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn spawn(scheduler: ReminderScheduler) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let join = tokio::spawn(scheduler.run(rx));
        Self { shutdown, join }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the loop and wait for it to exit
    pub async fn stop(self) {
        // The loop also exits when the receiver sees the sender dropped
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            warn!("Reminder scheduler task ended abnormally: {e}");
        }
    }
}

/// Process-wide start/stop guard around [`SchedulerHandle`]
pub struct SchedulerController {
    slot: Mutex<Slot>,
}

impl Default for SchedulerController {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot::Idle),
        }
    }
}

impl SchedulerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(&self, scheduler: ReminderScheduler) -> Result<(), LifecycleError> {
        let mut slot = self.slot.lock().await;
        if let Slot::Running(handle) = &*slot {
            if !handle.is_finished() {
                return Err(LifecycleError::AlreadyRunning);
            }
        }
        *slot = Slot::Running(SchedulerHandle::spawn(scheduler));
        info!("Reminder scheduler spawned");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut slot = self.slot.lock().await;
        match std::mem::replace(&mut *slot, Slot::Stopped) {
            Slot::Running(handle) => {
                handle.stop().await;
                Ok(())
            }
            previous => {
                *slot = previous;
                Err(LifecycleError::NotRunning)
            }
        }
    }

    pub async fn state(&self) -> SchedulerState {
        match &*self.slot.lock().await {
            Slot::Idle => SchedulerState::Idle,
            Slot::Running(handle) if !handle.is_finished() => SchedulerState::Running,
            Slot::Running(_) | Slot::Stopped => SchedulerState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::scheduler::tests::{monday_at, FixedClock, RecordingNotifier};
    use crate::features::reminders::store::ReminderStore;
    use std::sync::Arc;

    fn scheduler(dir: &tempfile::TempDir) -> ReminderScheduler {
        ReminderScheduler::new(
            ReminderStore::new(dir.path().join("reminders.json")),
            Arc::new(RecordingNotifier::default()),
        )
        .with_clock(Arc::new(FixedClock(monday_at(10, 0, 0))))
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let controller = SchedulerController::new();

        controller.start(scheduler(&dir)).await.unwrap();
        assert_eq!(controller.state().await, SchedulerState::Running);
        assert_eq!(
            controller.start(scheduler(&dir)).await,
            Err(LifecycleError::AlreadyRunning)
        );

        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_then_restart() {
        let dir = tempfile::tempdir().unwrap();
        let controller = SchedulerController::new();

        assert_eq!(controller.state().await, SchedulerState::Idle);
        assert_eq!(controller.stop().await, Err(LifecycleError::NotRunning));

        controller.start(scheduler(&dir)).await.unwrap();
        controller.stop().await.unwrap();
        assert_eq!(controller.state().await, SchedulerState::Stopped);
        assert_eq!(controller.stop().await, Err(LifecycleError::NotRunning));

        controller.start(scheduler(&dir)).await.unwrap();
        assert_eq!(controller.state().await, SchedulerState::Running);
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_stop_joins_loop() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SchedulerHandle::spawn(scheduler(&dir));
        tokio::time::timeout(std::time::Duration::from_secs(5), handle.stop())
            .await
            .unwrap();
    }
}
