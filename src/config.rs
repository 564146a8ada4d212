use std::{net::SocketAddr, str::FromStr};

use teloxide::types::ChatId;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("{key} can't be parsed: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// `None` when `TEACHER_ID` is absent or not a number.
    pub teacher: Option<ChatId>,
    pub database_url: String,
    pub log_level: String,
    pub webhook: Option<Webhook>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let teacher = lookup("TEACHER_ID").and_then(|id| id.trim().parse::<i64>().ok().map(ChatId));

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".into());

        let webhook = match (lookup("WEBHOOK_URL"), lookup("WEBHOOK_ADDR")) {
            (Some(url), Some(addr)) => Some(Webhook {
                url: parse("WEBHOOK_URL", url)?,
                addr: parse("WEBHOOK_ADDR", addr)?,
            }),
            _ => None,
        };

        Ok(Self {
            token,
            teacher,
            database_url,
            log_level,
            webhook,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
