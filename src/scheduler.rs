// SPDX-License-Identifier: MPL-2.0

//! Supervised periodic tick task
//!
//! Drives a sampling closure on a fixed cadence. Tick errors are logged and
//! swallowed so one bad read never stops telemetry, and shutdown joins the
//! task deterministically instead of abandoning a free-running thread.

use std::fmt;
use std::time::Duration;

use log::warn;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Handle to a running periodic task.
pub struct Scheduler {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn a task invoking `on_tick` once per `interval`.
    ///
    /// The first tick fires immediately. Ticks never overlap: the next one
    /// is not scheduled until `on_tick` returns, and a slow tick delays the
    /// cadence rather than bursting to catch up. An `Err` from a tick is
    /// logged at warn level and the loop continues.
    pub fn spawn<F, E>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = on_tick() {
                            warn!("tick skipped: {err}");
                        }
                    }
                    _ = stopped.changed() => break,
                }
            }
        });
        Self { stop, task }
    }

    /// Stop the cadence and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(err) = self.task.await {
            warn!("scheduler task failed to join: {err}");
        }
    }
}
