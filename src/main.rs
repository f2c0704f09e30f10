//! Terra: interactive textured Earth globe.
//!
//! Usage: terra [--assets DIR] [--config FILE] [--screenshots DIR]

use std::path::PathBuf;

use clap::Parser;
use terra::{TerraError, Viewer};

#[derive(Parser)]
#[command(name = "terra")]
#[command(version, about = "Interactive textured Earth globe", long_about = None)]
struct Cli {
    /// Directory containing the layer textures
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Saved state file
    #[arg(long, default_value = "terra_config.json")]
    config: PathBuf,

    /// Directory screenshots are written to
    #[arg(long, default_value = ".")]
    screenshots: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    let cli = Cli::parse();

    let result = Viewer::builder()
        .with_assets(cli.assets)
        .with_config(cli.config)
        .with_screenshot_dir(cli.screenshots)
        .build()
        .run();

    match result {
        Ok(()) => {}
        Err(e @ TerraError::MissingAssets(_)) => {
            log::error!("{e}; place them in the asset directory");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
