//! Per-move countdown clock.
//!
//! `TurnClock` owns at most one live countdown task. Restarting the clock
//! aborts the previous task before spawning the next, so a turn change can
//! never leave two countdowns racing. The task ticks once per second,
//! broadcasting the remaining time, and on reaching zero forfeits the game
//! for the side on the clock and announces `TimeExpired`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::events::GameEvent;
use super::feed::EventFeed;
use crate::engine::game::Game;
use crate::engine::types::Color;

/// Cancellable per-turn countdown.
#[derive(Debug)]
pub struct TurnClock {
    limit_secs: u32,
    task: Option<JoinHandle<()>>,
}

impl TurnClock {
    pub fn new(limit_secs: u32) -> Self {
        TurnClock {
            limit_secs,
            task: None,
        }
    }

    /// The configured per-move limit.
    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    /// Is a countdown task currently live?
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start counting down for `color`, cancelling any countdown already in
    /// flight first. Broadcasts the full remaining time immediately, then a
    /// tick every second; at zero the game is forfeited for `color`.
    pub fn restart(&mut self, color: Color, game: Arc<Mutex<Game>>, feed: Arc<EventFeed>) {
        self.stop();

        let limit = self.limit_secs;
        self.task = Some(tokio::spawn(async move {
            let mut remaining = limit;
            feed.broadcast(GameEvent::tick(color, remaining)).await;

            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                feed.broadcast(GameEvent::tick(color, remaining)).await;

                if remaining == 0 {
                    game.lock().await.forfeit_on_time(color);
                    info!(%color, "move clock expired");
                    feed.broadcast(GameEvent::time_expired(color)).await;
                    return;
                }
            }
        }));
    }

    /// Cancel the live countdown, if any.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TurnClock {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
