/// Game configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Seconds each player gets per move before losing on time.
    pub turn_time_limit_secs: u32,
    /// Display name for the white player.
    pub white_player: String,
    /// Display name for the black player.
    pub black_player: String,
}

impl GameConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        GameConfig {
            turn_time_limit_secs: std::env::var("CHESS_TURN_TIME_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            white_player: std::env::var("CHESS_WHITE_PLAYER").unwrap_or_else(|_| "White".into()),
            black_player: std::env::var("CHESS_BLACK_PLAYER").unwrap_or_else(|_| "Black".into()),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            turn_time_limit_secs: 30,
            white_player: "White".into(),
            black_player: "Black".into(),
        }
    }
}
