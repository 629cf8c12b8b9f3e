use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub analyzer_temperature: f32,
    pub analyzer_max_tokens: u32,
    pub analyzer_timeout_secs: u64,
    pub questions_path: Option<String>,
    pub public_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_api_url: get_env_or("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            openai_model: get_env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            analyzer_temperature: get_env_parse_or("ANALYZER_TEMPERATURE", 0.3)?,
            analyzer_max_tokens: get_env_parse_or("ANALYZER_MAX_TOKENS", 1000)?,
            analyzer_timeout_secs: get_env_parse_or("ANALYZER_TIMEOUT_SECS", 60)?,
            questions_path: env::var("QUESTIONS_PATH").ok().filter(|p| !p.trim().is_empty()),
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
