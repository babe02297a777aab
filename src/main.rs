mod catalog;
mod control;
mod debounce;
mod device;
mod message;
mod player;

use crate::catalog::VideoCatalog;
use crate::control::Installation;
use crate::device::handshake::{self, HELLO_BUDGET, HELLO_TOKEN};
use crate::device::link::Interactive;
use crate::device::locator::{self, PortFilter, SystemPorts, RETRY_INTERVAL};
use crate::player::controller::PlaybackController;
use crate::player::supervisor::{ProcessSupervisor, SystemPlayer};
use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Plays a video for each touched channel of the serial touch controller.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the `<digit>*.mp4` clips; the last one by name is idle.
    #[clap(long, value_parser, env = "VIDEO_DIR", default_value = "movies")]
    pub video_dir: PathBuf,

    /// Verbose diagnostics (serial ports, handshake noise, every touch message).
    #[clap(short, long, env = "DEBUG", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub verbose: bool,

    /// Read touch messages from the terminal instead of a device. Skips the handshake.
    #[clap(short, long, env = "DEBUGUSEPORT", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub interactive: bool,

    /// Accept the first serial port found, whatever its vendor.
    #[clap(long, env = "DEBUGANYPORT", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub any_port: bool,

    /// Use this serial port instead of searching for the controller.
    #[clap(short, long, value_parser, env = "TOUCH_PORT")]
    pub port: Option<String>,

    /// Don't wait for the controller's greeting.
    #[clap(long, env = "DEBUGSKIPHELLO", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub skip_handshake: bool,

    /// Video player executable, started as `<player> --no-keys --layer <layer> <clip>`.
    #[clap(long, value_parser, env = "PLAYER", default_value = player::PLAYER_PROGRAM)]
    pub player: String,

    /// Process name of running players, used to stop the previous clip.
    #[clap(long, value_parser, env = "PLAYER_PROCESS", default_value = player::PLAYER_PROCESS)]
    pub player_process: String,

    /// Display layer handed to each new player.
    #[clap(long, value_parser, default_value_t = player::PLAYER_LAYER)]
    pub layer: u32,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();

    // install tracing
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(fmt::Layer::new().with_writer(std::io::stdout));
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to set a global collector")?;

    let catalog = VideoCatalog::scan(&args.video_dir)?;
    tracing::info!(count = catalog.len(), clips = ?catalog.clips(), "video catalog");

    let backend = SystemPlayer::new(&args.player, &args.player_process, args.layer);
    let playback = PlaybackController::new(catalog, ProcessSupervisor::new(backend));

    if args.interactive {
        return Installation::new(Interactive::stdin(), playback)
            .run()
            .context("touch controller stopped");
    }

    let path = match &args.port {
        Some(path) => path.clone(),
        None => {
            let filter = if args.any_port {
                PortFilter::any()
            } else {
                PortFilter::default()
            };
            locator::wait_for_device(&mut SystemPorts, &filter, RETRY_INTERVAL)
        }
    };
    let mut link = device::open_serial(&path)?;

    if !args.skip_handshake {
        tracing::info!("waiting for the controller to say '{}'...", HELLO_TOKEN);
        handshake::negotiate(&mut link, HELLO_TOKEN, HELLO_BUDGET)?;
    }

    Installation::new(link, playback)
        .run()
        .with_context(|| format!("touch controller on {path} stopped"))
}
