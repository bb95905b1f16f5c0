//! Sub-command implementations.

pub mod batch;
pub mod config;
pub mod process;
pub mod render;

use std::path::Path;

use pickr_core::PickrConfig;

/// Load the file named by `--config`, or the defaults when none is given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PickrConfig> {
    match config_path {
        Some(path) => Ok(PickrConfig::from_file(Path::new(path))?),
        None => Ok(PickrConfig::default()),
    }
}
