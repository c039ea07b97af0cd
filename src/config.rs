//! Runtime configuration sourced from environment variables.
//!
//! Every knob has a default so the gateway starts with no environment at
//! all. Empty or whitespace-only values are treated as unset.

use std::str::FromStr;
use std::time::Duration;

pub const ENV_BIND_HOST: &str = "NOTES_BIND_HOST";
pub const ENV_PORT: &str = "NOTES_PORT";
pub const ENV_ENVIRONMENT: &str = "NOTES_ENV";
pub const ENV_ACTOR_TIMEOUT_SECS: &str = "NOTES_ACTOR_TIMEOUT_SECS";
pub const ENV_MAILBOX_CAPACITY: &str = "NOTES_MAILBOX_CAPACITY";
pub const ENV_AUTH_TOKEN: &str = "NOTES_AUTH_TOKEN";

const DEFAULT_BIND_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ENVIRONMENT: &str = "dev";
const DEFAULT_ACTOR_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAILBOX_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Interface the HTTP listener binds to.
    pub bind_host: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Deployment environment label stamped into every actor request.
    pub environment: String,
    /// How long the HTTP layer waits for the note actor to reply.
    pub actor_timeout_secs: u64,
    /// Bounded mailbox size of the note actor.
    pub mailbox_capacity: usize,
    /// Optional bearer token. When set, note routes require it.
    pub auth_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            actor_timeout_secs: DEFAULT_ACTOR_TIMEOUT_SECS,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            auth_token: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_host: non_empty_env(ENV_BIND_HOST).unwrap_or(defaults.bind_host),
            port: parsed_env(ENV_PORT).unwrap_or(defaults.port),
            environment: non_empty_env(ENV_ENVIRONMENT).unwrap_or(defaults.environment),
            actor_timeout_secs: parsed_env(ENV_ACTOR_TIMEOUT_SECS)
                .unwrap_or(defaults.actor_timeout_secs),
            // The mailbox is bounded; a zero capacity cannot be constructed,
            // so it counts as invalid like any unparsable value.
            mailbox_capacity: parsed_env(ENV_MAILBOX_CAPACITY)
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.mailbox_capacity),
            auth_token: non_empty_env(ENV_AUTH_TOKEN),
        }
    }

    pub fn actor_timeout(&self) -> Duration {
        Duration::from_secs(self.actor_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_env<T: FromStr>(key: &str) -> Option<T> {
    non_empty_env(key).and_then(|value| value.parse().ok())
}
