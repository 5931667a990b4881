//! Session layer: glue between the engine and the presentation layer.
//!
//! A [`GameSession`] owns one [`Game`] behind a lock, fans events out to
//! subscribers through an [`EventFeed`], and runs the per-move [`TurnClock`].
//! The presentation layer submits decoded drag-and-drop payloads through
//! [`GameSession::submit_move`] and reflects whatever events come back.

pub mod clock;
pub mod events;
pub mod feed;

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::config::GameConfig;
use crate::engine::game::{Game, PromotionChooser};
use crate::engine::types::{Color, Coord, EngineError, GameStatus, Piece};

pub use clock::TurnClock;
pub use events::GameEvent;
pub use feed::{EventFeed, SubscriberId};

/// One hot-seat game wired to its clock and event feed.
pub struct GameSession {
    game: Arc<Mutex<Game>>,
    feed: Arc<EventFeed>,
    clock: Mutex<TurnClock>,
    chooser: Mutex<Box<dyn PromotionChooser + Send>>,
    config: GameConfig,
}

impl GameSession {
    /// Create a session from the standard starting position. The chooser is
    /// consulted whenever a pawn reaches its promotion row.
    pub fn new(config: GameConfig, chooser: Box<dyn PromotionChooser + Send>) -> Arc<Self> {
        Self::with_game(Game::new(), config, chooser)
    }

    /// Create a session around an existing game (custom starting positions).
    pub fn with_game(
        mut game: Game,
        config: GameConfig,
        chooser: Box<dyn PromotionChooser + Send>,
    ) -> Arc<Self> {
        game.white_player = config.white_player.clone();
        game.black_player = config.black_player.clone();
        Arc::new(GameSession {
            game: Arc::new(Mutex::new(game)),
            feed: EventFeed::new(),
            clock: Mutex::new(TurnClock::new(config.turn_time_limit_secs)),
            chooser: Mutex::new(chooser),
            config,
        })
    }

    /// Attach an event subscriber.
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<GameEvent>) {
        self.feed.subscribe().await
    }

    /// Detach an event subscriber.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        self.feed.unsubscribe(id).await;
    }

    /// Announce the initial position and start white's clock.
    pub async fn start(&self) {
        let game = self.game.lock().await;
        self.feed
            .broadcast(GameEvent::game_state(
                game.layout_rows(),
                game.side_to_move(),
                game.status(),
                &game.white_player,
                &game.black_player,
            ))
            .await;

        let mut clock = self.clock.lock().await;
        clock.restart(game.side_to_move(), self.game.clone(), self.feed.clone());
    }

    /// Submit a move from the presentation layer.
    ///
    /// `piece_symbol` is the dragged piece as the board renders it
    /// ('P'..'K' white, 'p'..'k' black). An unknown symbol is a malformed
    /// payload and is dropped before the engine sees it. Rejections follow
    /// the engine's feedback policy: wrong turn gets a notice event,
    /// geometrically illegal moves are silently ignored.
    pub async fn submit_move(&self, piece_symbol: char, from: Coord, to: Coord) {
        let Some(piece) = Piece::from_symbol(piece_symbol) else {
            debug!(piece_symbol = %piece_symbol, "dropping malformed move payload");
            return;
        };

        let mut game = self.game.lock().await;
        let mut chooser = self.chooser.lock().await;
        match game.submit_move(piece, from, to, chooser.as_mut()) {
            Ok(applied) => {
                drop(chooser);

                if applied.promotion_defaulted {
                    self.feed
                        .broadcast(GameEvent::promotion_defaulted(applied.to, piece.color))
                        .await;
                }
                self.feed
                    .broadcast(GameEvent::move_applied(game.layout_rows(), &applied))
                    .await;
                if let Some(color) = applied.check_against {
                    self.feed.broadcast(GameEvent::check_announced(color)).await;
                }

                let mut clock = self.clock.lock().await;
                clock.restart(applied.side_to_move, self.game.clone(), self.feed.clone());
            }
            Err(EngineError::NotYourTurn { side_to_move }) => {
                self.feed
                    .broadcast(GameEvent::not_your_turn(side_to_move))
                    .await;
            }
            Err(err @ EngineError::IllegalMove { .. }) => {
                // Deliberate no-feedback policy for illegal moves.
                debug!(%err, "move ignored");
            }
            Err(err) => {
                debug!(%err, "move rejected");
            }
        }
    }

    /// Stop the clock without ending the game (used on shutdown).
    pub async fn stop_clock(&self) {
        self.clock.lock().await.stop();
    }

    // -----------------------------------------------------------------
    // State queries for the presentation layer
    // -----------------------------------------------------------------

    pub async fn side_to_move(&self) -> Color {
        self.game.lock().await.side_to_move()
    }

    pub async fn status(&self) -> GameStatus {
        self.game.lock().await.status()
    }

    /// Board snapshot, top row first.
    pub async fn layout_rows(&self) -> [String; 8] {
        self.game.lock().await.layout_rows()
    }

    /// The symbol on a square, if any — how the presentation layer reads
    /// the drag source.
    pub async fn piece_symbol_at(&self, at: Coord) -> Option<char> {
        self.game.lock().await.board().piece_at(at).map(|p| p.symbol())
    }

    /// The configured per-move time limit.
    pub fn turn_time_limit_secs(&self) -> u32 {
        self.config.turn_time_limit_secs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
