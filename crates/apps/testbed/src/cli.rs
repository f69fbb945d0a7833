//! Command line arguments for the headless testbed

use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments shared by testbed runs
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Run N frames with per-frame debug output then exit
    #[arg(long, value_name = "FRAMES")]
    pub debug: Option<u64>,

    /// Load scene configuration from a TOML file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}
