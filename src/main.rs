//! Terminal hot-seat driver — a minimal stand-in for the board UI.
//!
//! Reads moves as algebraic square pairs ("e2e4"), mirrors engine events to
//! stdout, and prompts on promotion. All rules live in the library; this
//! binary only shuttles input and output.

use hotseat_chess::config::GameConfig;
use hotseat_chess::engine::game::PromotionChooser;
use hotseat_chess::engine::types::{Color, Coord};
use hotseat_chess::session::{GameEvent, GameSession};

use tokio::io::{AsyncBufReadExt, BufReader};

/// Prompts the player on stdout and reads the choice from stdin.
struct TerminalPromotion;

impl PromotionChooser for TerminalPromotion {
    fn choose(&mut self, at: Coord, color: Color) -> Option<char> {
        println!("{color} pawn promotes on {at}: (q)ueen, (r)ook, (b)ishop or k(n)ight?");
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok()?;
        line.trim().chars().next()
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotseat_chess=info".into()),
        )
        .init();

    let config = GameConfig::from_env();
    tracing::info!(
        "hotseat-chess v{} starting ({}s per move)",
        env!("CARGO_PKG_VERSION"),
        config.turn_time_limit_secs
    );

    let session = GameSession::new(config, Box::new(TerminalPromotion));
    let (_subscriber, mut events) = session.subscribe().await;
    session.start().await;

    // Mirror engine events to the terminal.
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                GameEvent::GameState {
                    board, side_to_move, ..
                } => {
                    print_board(&board);
                    println!("{side_to_move} to move");
                }
                GameEvent::MoveApplied {
                    board,
                    side_to_move,
                    ..
                } => {
                    print_board(&board);
                    println!("{side_to_move} to move");
                }
                GameEvent::CheckAnnounced { color } => {
                    println!("{color} is in check!");
                }
                GameEvent::PromotionDefaulted { .. } => {
                    println!("Invalid choice! Defaulting to queen.");
                }
                GameEvent::NotYourTurn { side_to_move } => {
                    println!("Not your turn: {side_to_move} to move.");
                }
                GameEvent::TickUpdate {
                    color,
                    seconds_left,
                } => {
                    if seconds_left <= 5 && seconds_left > 0 {
                        println!("({color}: {seconds_left}s left)");
                    }
                }
                GameEvent::TimeExpired { loser } => {
                    println!("{loser} loses on time!");
                    return;
                }
            }
        }
    });

    // Read "e2e4"-style moves until the game ends or input closes.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(std::time::Duration::from_millis(200));
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input == "quit" {
                    break;
                }
                match parse_move(input) {
                    Some((from, to)) => {
                        let Some(symbol) = session.piece_symbol_at(from).await else {
                            println!("No piece on {from}.");
                            continue;
                        };
                        session.submit_move(symbol, from, to).await;
                    }
                    None => println!("Moves look like e2e4 (or type quit)."),
                }
            }
            _ = poll.tick() => {
                if session.status().await.is_game_over() {
                    break;
                }
            }
        }
    }

    session.stop_clock().await;
    printer.abort();
}

fn parse_move(input: &str) -> Option<(Coord, Coord)> {
    if input.len() != 4 {
        return None;
    }
    let from = Coord::from_algebraic(&input[..2])?;
    let to = Coord::from_algebraic(&input[2..])?;
    Some((from, to))
}

fn print_board(rows: &[String; 8]) {
    for (i, row) in rows.iter().enumerate() {
        let rank = 8 - i;
        let spaced: String = row
            .chars()
            .flat_map(|c| [c, ' '])
            .collect();
        println!("{rank} {}", spaced.trim_end());
    }
    println!("  a b c d e f g h");
}
