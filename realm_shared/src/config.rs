//! Configuration system.
//!
//! Loads client configuration from JSON strings/files (file IO left to app).

use serde::{Deserialize, Serialize};

/// Root client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server address, e.g. `127.0.0.1:40000`.
    pub server_addr: String,
    /// Frame rate the client loop targets.
    pub frame_hz: u32,
    /// Account name sent with login/register requests.
    #[serde(default = "default_username")]
    pub username: String,
    /// Account password sent with login/register requests.
    #[serde(default)]
    pub password: String,
    /// Local player movement speed in world units per second.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Path the crash report file is appended to.
    #[serde(default = "default_crash_report_path")]
    pub crash_report_path: String,
}

fn default_username() -> String {
    "Player".to_string()
}

fn default_move_speed() -> f32 {
    96.0
}

fn default_crash_report_path() -> String {
    "crash_report.txt".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:40000".to_string(),
            frame_hz: 60,
            username: default_username(),
            password: String::new(),
            move_speed: default_move_speed(),
            crash_report_path: default_crash_report_path(),
        }
    }
}

impl ClientConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
