use anyhow::Result;
use std::env;

use crate::constants::DEFAULT_SERVER_PORT;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub session_secret: String,
    pub zoom_account_id: Option<String>,
    pub zoom_client_id: Option<String>,
    pub zoom_client_secret: Option<String>,
    pub google_calendar_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?,
            zoom_account_id: env::var("ZOOM_ACCOUNT_ID").ok(),
            zoom_client_id: env::var("ZOOM_CLIENT_ID").ok(),
            zoom_client_secret: env::var("ZOOM_CLIENT_SECRET").ok(),
            google_calendar_token: env::var("GOOGLE_CALENDAR_TOKEN").ok(),
        })
    }
}
