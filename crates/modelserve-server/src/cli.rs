use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modelserve")]
#[command(author, version, about = "Serve pre-trained models over HTTP", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "modelserve.yaml", env = "MODELSERVE_CONFIG")]
    pub config: String,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Directory holding model artifacts (overrides the config file)
    #[arg(short, long)]
    pub models_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
