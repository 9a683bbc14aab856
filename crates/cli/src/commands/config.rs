use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use aluquote_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let mut push = |key: &str, value: &str, env_key: Option<&str>| {
        lines.push(render_line(
            key,
            value,
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    };

    push("database.url", &config.database.url, Some("ALUQUOTE_DATABASE_URL"));
    push(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        Some("ALUQUOTE_DB_MAX_CONNECTIONS"),
    );
    push("database.timeout_secs", &config.database.timeout_secs.to_string(), None);

    push("server.bind_address", &config.server.bind_address, Some("ALUQUOTE_BIND_ADDRESS"));
    push("server.port", &config.server.port.to_string(), Some("ALUQUOTE_PORT"));
    push(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        None,
    );

    push("email.enabled", &config.email.enabled.to_string(), Some("ALUQUOTE_EMAIL_ENABLED"));
    push("email.smtp_host", &config.email.smtp_host, Some("ALUQUOTE_SMTP_HOST"));
    push("email.smtp_port", &config.email.smtp_port.to_string(), Some("ALUQUOTE_SMTP_PORT"));
    push("email.username", &config.email.username, Some("ALUQUOTE_SMTP_USERNAME"));
    push("email.password", "<redacted>", Some("ALUQUOTE_SMTP_PASSWORD"));
    push("email.from_name", &config.email.from_name, None);
    push("email.from_address", &config.email.from_address, Some("ALUQUOTE_SMTP_FROM_ADDRESS"));

    push("logging.level", &config.logging.level, Some("ALUQUOTE_LOG_LEVEL"));
    push("logging.format", &format!("{:?}", config.logging.format), Some("ALUQUOTE_LOG_FORMAT"));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("ALUQUOTE_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let root = PathBuf::from("aluquote.toml");
    if root.exists() {
        return Some(root);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
