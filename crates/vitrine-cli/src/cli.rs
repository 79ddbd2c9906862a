//! Command-line argument parsing for Vitrine.

use std::path::PathBuf;

use clap::{ ArgAction, Parser };
use vitrine_core::{ MaterialType, PlatformKind };


/// Vitrine - replays a playback session against the window integrations.
#[derive( Parser, Debug )]
#[command( name = "vitrine" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Platform to emulate (defaults to the running OS).
    #[arg( long )]
    pub platform: Option<PlatformKind>,

    /// Window material to request (e.g. mica, acrylic, fullscreen-ui).
    #[arg( short, long )]
    pub material: Option<MaterialType>,

    /// Background tint opacity (0.0 to 1.0).
    #[arg( short, long )]
    pub opacity: Option<f32>,

    /// Title of the track to simulate.
    #[arg( short, long, default_value = "Song A" )]
    pub title: String,

    /// Start the simulated track paused.
    #[arg( long )]
    pub paused: bool,

    /// Directory containing play/pause/next/previous PNG icons.
    #[arg( long )]
    pub icons: Option<PathBuf>,

    /// Settings file to use instead of the default location.
    #[arg( short, long )]
    pub config: Option<PathBuf>,

    /// Enable both integrations for this run.
    #[arg( short, long )]
    pub enable: bool,

    /// Print the material catalogs and settings menu, then exit.
    #[arg( short, long )]
    pub list: bool,

    /// Persist the effective settings after the run.
    #[arg( long )]
    pub save: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg( short, long, action = ArgAction::Count )]
    pub verbose: u8,
}
