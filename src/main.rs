// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use snapdiag::SourceKind;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "snapdiag")]
#[command(about = "Photograph a device and get a diagnosis from the classification service")]
#[command(version = snapdiag::constants::app_info::version())]
struct Cli {
    /// Base URL of the classification service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (default: <config dir>/snapdiag/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the service is up and configured
    Health,

    /// Take a photo with the platform camera (falls back to the webcam) and identify it
    Camera,

    /// Take a photo with a V4L2 webcam and identify it
    Webcam {
        /// Video device to open (default from config, usually /dev/video0)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Identify an image file
    File {
        /// Image to upload; a file dialog opens when omitted
        path: Option<PathBuf>,
    },

    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the profile
    Show,

    /// Change profile fields; omitted fields keep their value
    Edit {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Blank keeps the current number
        #[arg(long)]
        phone: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=snapdiag=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let load_config = || cli::load_config(cli.config.as_deref(), cli.api_url.as_deref());

    match cli.command {
        Commands::Health => cli::check_health(&load_config()?),
        Commands::Camera => cli::identify(&load_config()?, SourceKind::Camera, None),
        Commands::Webcam { device } => {
            let mut config = load_config()?;
            if let Some(device) = device {
                config.webcam_device = device;
            }
            cli::identify(&config, SourceKind::Webcam, None)
        }
        Commands::File { path } => cli::identify(&load_config()?, SourceKind::File, path),
        Commands::Profile { action } => match action {
            ProfileAction::Show => cli::show_profile(),
            ProfileAction::Edit { name, email, phone } => cli::edit_profile(name, email, phone),
        },
    }
}
