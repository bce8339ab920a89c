// What you SEE:
// • A borderless square window with a green front face. Drag it anywhere.
// • Around it, a second full-screen process draws receding wireframe layers that
//   stretch from the screen centre to the window, so the window looks like the
//   near face of a cube sticking out of the desktop.
// • `--cube` instead opens one window with a real rotating, lit cube that tilts
//   as you drag it away from the screen centre.
// • ESC (on the front window) quits; the overlay goes with it.

mod clip;
mod cube;
mod desktop;
mod draw;
mod error;
mod front;
mod overlay;
mod process;
mod projection;
mod settings;
mod ticker;
mod types;

use clap::Parser;
use error::Error;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "protrude-cube")]
#[command(about = "A draggable window that looks like the front of a 3D cube")]
#[command(version)]
struct Cli {
    /// Run as the full-screen click-through overlay (started by the front window)
    #[arg(long, conflicts_with = "cube")]
    overlay: bool,

    /// Run the single-window rotating cube instead
    #[arg(long)]
    cube: bool,

    /// Do not start the overlay process alongside the front window
    #[arg(long)]
    no_overlay: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Log a fatal error once and map the outcome to a process exit code.
fn exit_code(result: Result<(), Error>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
    info!("protrude-cube {}", env!("CARGO_PKG_VERSION"));

    let result = if cli.overlay {
        overlay::run()
    } else if cli.cube {
        cube::run()
    } else {
        front::run(!cli.no_overlay)
    };

    let code = exit_code(result);
    if code != 0 {
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_flag_matches_child_arguments() {
        let cli = Cli::try_parse_from(["protrude-cube", settings::OVERLAY_FLAG]).expect("parse");
        assert!(cli.overlay);
        assert!(!cli.cube);
    }

    #[test]
    fn no_flags_means_front_window() {
        let cli = Cli::try_parse_from(["protrude-cube"]).expect("parse");
        assert!(!cli.overlay && !cli.cube && !cli.no_overlay);
    }

    #[test]
    fn failures_exit_non_zero() {
        assert_eq!(exit_code(Ok(())), 0);
        assert_eq!(exit_code(Err(Error::WindowInit("no display".into()))), 1);
    }

    #[test]
    fn overlay_and_cube_are_exclusive() {
        assert!(Cli::try_parse_from(["protrude-cube", "--overlay", "--cube"]).is_err());
    }
}
