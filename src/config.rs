use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// How long a reservation may wait for its showing's serialization
    /// point before failing with the retryable `Busy` error.
    pub reserve_lock_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            reserve_lock_timeout_ms: env::var("RESERVE_LOCK_TIMEOUT_MS")
                .unwrap_or_else(|_| "250".to_string())
                .parse()
                .expect("RESERVE_LOCK_TIMEOUT_MS must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn reserve_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.reserve_lock_timeout_ms)
    }
}
