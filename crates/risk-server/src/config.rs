use anyhow::Context;
use protocol::config::{
    default_allowed_origins, ServerConfig, DEFAULT_LISTEN_ADDR, DEFAULT_MODEL_PATH,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Args;

/// Effective startup settings after layering flags over the config file
/// over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) listen_addr: SocketAddr,
    pub(crate) model_path: PathBuf,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) log_json: bool,
    pub(crate) log_to_stderr: bool,
}

pub(crate) fn load_server_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ServerConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

pub(crate) fn resolve_settings(args: &Args, config: ServerConfig) -> anyhow::Result<Settings> {
    let listen_addr = args
        .listen_addr
        .clone()
        .or(config.listen_addr)
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
    let listen_addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid listen_addr {listen_addr}"))?;

    let model_path = args
        .model
        .clone()
        .or_else(|| config.model_path.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

    let allowed_origins = config
        .cors
        .and_then(|cors| cors.allowed_origins)
        .unwrap_or_else(default_allowed_origins);
    if let Some(origin) = allowed_origins.iter().find(|origin| origin.trim().is_empty()) {
        anyhow::bail!("cors allowed_origins contains an empty entry {origin:?}");
    }

    let log = config.log.unwrap_or_default();
    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| log.dir.map(PathBuf::from));

    Ok(Settings {
        listen_addr,
        model_path,
        allowed_origins,
        log_dir,
        log_json: args.log_json || log.json,
        log_to_stderr: args.log_to_stderr,
    })
}
