use std::net::SocketAddr;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub feed: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5173".to_string())
            .parse()
            .expect("Invalid PORT");
        let listen_addr = SocketAddr::from(([0, 0, 0, 0], port));
        let api_key = std::env::var("ALPACA_API_KEY").ok().filter(|v| !v.is_empty());
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .ok()
            .filter(|v| !v.is_empty());
        let feed = std::env::var("ALPACA_FEED").unwrap_or_else(|_| "iex".into());
        let static_dir = std::env::var("PULSE_STATIC_DIR").unwrap_or_else(|_| "public".into());
        Self {
            listen_addr,
            api_key,
            api_secret,
            feed,
            static_dir,
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        }
    }

    pub fn upstream_url(&self) -> String {
        format!("wss://stream.data.alpaca.markets/v2/{}", self.feed)
    }
}
