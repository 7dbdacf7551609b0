use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Walk a drawing on a real map and see how close you got.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discard the current session and start an empty one
    Reset,

    /// Fix the map center for this session
    Center {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Download the background map around the session center
    Map {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Record fixes from the configured receiver until Ctrl-C
    Walk {
        /// Stop after this many new fixes
        #[arg(long)]
        max_fixes: Option<usize>,
    },

    /// Rasterize the walked route
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Copy the render here as well as into the cache
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a candidate image against a reference image
    Score {
        reference: PathBuf,
        candidate: PathBuf,
    },

    /// Render the walked route and score it against the drawing
    Compare {
        drawing: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Lay the drawing over a background map image
    Overlay {
        drawing: PathBuf,
        background: PathBuf,

        /// Opacity of the drawing, 0.0 to 1.0
        #[arg(long, default_value_t = 0.5)]
        alpha: f32,

        #[arg(long, default_value = "overlay.png")]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ViewArgs {
    #[arg(long, default_value_t = 15)]
    pub zoom: u8,

    #[arg(long, default_value_t = 600)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
        assert!(Cli::command().get_author().is_none());
    }

    #[test]
    fn center_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["routeart", "center", "-33.86", "151.21"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Center { latitude, longitude } if latitude < 0.0 && longitude > 0.0
        ));
    }
}
