/// kframe-terminal: record two poses of a wireframe and play back the motion
///
/// Controls:
///   - Arrows / W,S: move the object
///   - Shift + Arrows / A,D: rotate it about its center
///   - N / M: shrink / grow
///   - 1 / 2: record the first / second keyframe
///   - P: play the recorded motion
///   - Q / ESC: quit

use anyhow::{Context, Result};
use clap::Parser;
use kframe_core::{parse_wireframe, Session};
use kframe_terminal::cli::{Cli, LogDestination};
use kframe_terminal::TerminalApp;
use std::fs::{self, File};
use std::io::{self, IsTerminal};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.config();
    let session = match &cli.mesh {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let wireframe = parse_wireframe(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Session::with_wireframe(&config, wireframe)?
        }
        None => Session::new(&config)?,
    };

    let mut app = TerminalApp::new(&config, session)?;
    app.run()?;
    Ok(())
}

/// Start env_logger at the `-v` level; `RUST_LOG` still overrides it
fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level()).parse_default_env();

    if let LogDestination::File(path) = cli.log_destination(io::stderr().is_terminal()) {
        let file = File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
