use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use mousetrack::Config;
use mousetrack::input::replay;
use mousetrack::layout::{Monitor, SessionContext, monitor_origin};
use mousetrack::track::Tracker;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MOUSETRACK_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "mousetrack")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Records pointer motion and clicks across every monitor into a PNG")]
struct Cli {
    /// Config file (default: ~/.config/mousetrack/config.toml)
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory for snapshot files
    #[arg(long, short = 'o', value_name = "DIR", global = true)]
    output: Option<PathBuf>,

    /// Fail instead of creating a missing output directory
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    no_create_dir: bool,

    /// Keep the canvas after saving instead of starting clean
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    keep: bool,

    /// Stroke opacity in percent (1-100)
    #[arg(long, value_name = "PERCENT", global = true,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    opacity: Option<u8>,

    /// Stroke width in pixels (1-25)
    #[arg(long, value_name = "PIXELS", global = true,
          value_parser = clap::value_parser!(u32).range(1..=25))]
    width: Option<u32>,

    /// Monitor geometry WxH+X+Y, trailing '*' marks the primary (repeatable)
    #[arg(long = "monitor", short = 'm', value_name = "GEOMETRY", global = true)]
    monitors: Vec<Monitor>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a session driven by an event script (stdin when FILE is omitted or '-')
    Replay {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the canvas layout computed for the configured monitors
    Layout,

    /// Write the documented default config file
    InitConfig {
        /// Write the effective settings (config file plus overrides) instead
        #[arg(long)]
        effective: bool,
    },

    /// Track the real pointer until SIGINT/SIGTERM, then save (SIGUSR1 toggles moves)
    #[cfg(all(feature = "live", unix))]
    Live,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(opacity) = cli.opacity {
        config.stroke.opacity = opacity.into();
    }
    if let Some(width) = cli.width {
        config.stroke.width = width.into();
    }
    if let Some(output) = &cli.output {
        config.output.directory = Some(output.to_string_lossy().into_owned());
    }
    if cli.no_create_dir {
        config.output.create_dir = false;
    }
    if cli.keep {
        config.output.clean_after_save = false;
    }
    Ok(config)
}

/// `--monitor` options win over the config file; `live` builds fall back to
/// asking the OS.
fn resolve_monitors(cli: &Cli, config: &Config) -> Result<Vec<Monitor>> {
    if !cli.monitors.is_empty() {
        return Ok(cli.monitors.clone());
    }
    if !config.layout.monitors.is_empty() {
        return Ok(config.layout.monitors.clone());
    }

    #[cfg(all(feature = "live", unix))]
    {
        let monitors = mousetrack::input::live::enumerate_monitors()?;
        if !monitors.is_empty() {
            return Ok(monitors);
        }
    }

    bail!("No monitors configured; pass --monitor WxH+X+Y or add [[layout.monitors]] to the config")
}

fn tracker_for(config: &Config, monitors: Vec<Monitor>) -> Tracker {
    Tracker::new(
        monitors,
        config.vertical_axis(),
        Arc::new(config.live_settings()),
        config.session_options(),
    )
}

fn print_layout(context: &SessionContext) {
    let bounds = &context.bounds;
    println!(
        "bounding box: ({}, {}) - ({}, {})",
        bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
    );
    println!(
        "canvas: {}x{}",
        context.geometry.width, context.geometry.height
    );
    println!(
        "primary offset: ({}, {})",
        context.offset.dx, context.offset.dy
    );
    for (index, monitor) in context.monitors.iter().enumerate() {
        let (x, y) = monitor_origin(monitor, bounds, context.axis);
        println!("monitor{index}: {monitor} at canvas ({x}, {y})");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Command::InitConfig { effective: false } => {
            let path = Config::create_default_file()?;
            println!("{}", path.display());
        }
        Command::InitConfig { effective: true } => {
            let config = load_config(&cli)?;
            let path = Config::get_config_path()?;
            if path.exists() {
                bail!("Config file already exists at {}", path.display());
            }
            config.save()?;
            println!("{}", path.display());
        }
        Command::Layout => {
            let config = load_config(&cli)?;
            let monitors = resolve_monitors(&cli, &config)?;
            let context = SessionContext::new(monitors, config.vertical_axis())?;
            print_layout(&context);
        }
        Command::Replay { file } => {
            let config = load_config(&cli)?;
            let monitors = resolve_monitors(&cli, &config)?;
            let target = config.save_target();
            let mut tracker = tracker_for(&config, monitors);

            let saved = match file.as_deref() {
                Some(path) if path.as_os_str() != "-" => {
                    let reader = File::open(path).with_context(|| {
                        format!("Failed to open event script {}", path.display())
                    })?;
                    info!("Replaying {}", path.display());
                    replay::run(BufReader::new(reader), &mut tracker, &target)?
                }
                _ => {
                    info!("Replaying events from stdin");
                    replay::run(io::stdin().lock(), &mut tracker, &target)?
                }
            };

            for path in saved {
                println!("{}", path.display());
            }
        }
        #[cfg(all(feature = "live", unix))]
        Command::Live => {
            let config = load_config(&cli)?;
            let monitors = resolve_monitors(&cli, &config)?;
            let target = config.save_target();
            let mut tracker = tracker_for(&config, monitors);
            let path = mousetrack::input::live::run(&mut tracker, &target, config.poll_interval())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
