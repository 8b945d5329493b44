//! exul - inspect X11 windows from the command line
//!
//! Logs go to stderr so stdout only carries command output.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use exul::backend::WindowId;
use exul::{WindowFilter, X11Connection, locator, screenshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "exul")]
#[command(about = "Find, inspect and capture X11 windows")]
struct Cli {
    /// X display to connect to (defaults to $DISPLAY)
    #[arg(long, global = true)]
    display: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate all windows on the system
    Enumerate,
    /// Find a particular window by the given information
    Find(FindArgs),
    /// Find the geometry of a particular window
    Geometry(FindArgs),
    /// Save a PNG screenshot of a particular window
    Screenshot {
        #[command(flatten)]
        find: FindArgs,
        /// Where to write the PNG
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the process id owning a particular window
    Pid(FindArgs),
    /// Print the raw pointer state
    Pointer,
}

#[derive(Args, Debug)]
struct FindArgs {
    /// The window ID to obtain (decimal or 0x-prefixed hex)
    #[arg(long = "window-id", visible_alias = "wid", value_parser = parse_window_id)]
    window_id: Option<WindowId>,
    /// The window name to obtain
    #[arg(long = "window-name", visible_alias = "win")]
    window_name: Option<String>,
    /// The window class type to obtain
    #[arg(long = "class-type", visible_alias = "clt")]
    class_type: Option<String>,
    /// The window class name to obtain
    #[arg(long = "class-name", visible_alias = "cln")]
    class_name: Option<String>,
}

impl From<FindArgs> for WindowFilter {
    fn from(args: FindArgs) -> Self {
        WindowFilter {
            window_id: args.window_id,
            window_name: args.window_name,
            class_type: args.class_type,
            class_name: args.class_name,
        }
    }
}

fn parse_window_id(value: &str) -> Result<WindowId, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => WindowId::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid window id {value:?}: {e}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let display = X11Connection::connect(cli.display.as_deref()).context("Failed to connect to X server")?;
    run(&display, cli.command)?;
    display.close()?;
    Ok(())
}

fn run(display: &X11Connection, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Enumerate => {
            for entry in locator::enumerate(display) {
                let (window, depth) = entry?;
                let details = locator::describe(display, window)?;
                println!("{}{}", "  ".repeat(depth), details);
            }
        }
        Command::Find(args) => {
            let window = find(display, args)?;
            let details = locator::describe(display, window)?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Geometry(args) => {
            let window = find(display, args)?;
            let geometry = screenshot::geometry(display, window)?;
            println!("{}", serde_json::to_string_pretty(&geometry)?);
        }
        Command::Screenshot { find: args, output } => {
            let window = find(display, args)?;
            let image = screenshot::capture_full(display, window)?;
            let png = screenshot::encode_png(&image)?;
            std::fs::write(&output, png).with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Saved {}x{} screenshot to {}", image.width(), image.height(), output.display());
        }
        Command::Pid(args) => {
            let window = find(display, args)?;
            println!("{}", screenshot::owning_process_id(display, window)?);
        }
        Command::Pointer => {
            let pointer = screenshot::pointer_position(display)?;
            println!("{}", serde_json::to_string_pretty(&pointer)?);
        }
    }
    Ok(())
}

fn find(display: &X11Connection, args: FindArgs) -> anyhow::Result<WindowId> {
    let filter = WindowFilter::from(args);
    if filter.is_empty() {
        tracing::warn!("No filters given, using the first window found");
    }
    Ok(locator::find(display, &filter)?)
}
