use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "credit-risk-server",
    version,
    about = "HTTP scoring service for the credit-risk model"
)]
pub(crate) struct Args {
    /// Optional TOML config; flags below take precedence over it.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    #[arg(long)]
    pub(crate) listen_addr: Option<String>,
    /// XGBoost JSON model file.
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Write a daily-rolling JSON log into this directory.
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_json: bool,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}
