mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod maps;
pub mod receivers;
pub mod render;
pub mod session;
pub mod similarity;
pub mod utils;
pub mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use cli::{Cli, Command, ViewArgs};
use config::AppConfig;
use error::RouteArtError;
use geo::{GeoFix, MapView};
use maps::MapClient;
use receivers::GpsReceiver;
use render::{DrawingImage, RouteCache};
use session::SessionStore;

struct AppState {
    config: AppConfig,
    session: SessionStore,
}

impl AppState {
    fn view(&self, args: ViewArgs) -> Result<MapView> {
        let center = self
            .session
            .reference_center()
            .ok_or(RouteArtError::MissingCenter)
            .context("set one with `routeart center <lat> <lon>`")?;
        Ok(MapView::new(center, args.zoom, args.width, args.height)?)
    }

    fn route_cache(&self) -> RouteCache {
        RouteCache::new(self.config.cache_dir.join("routes"))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    utils::logging::init(config.log_level);

    info!("RouteArt starting up...");

    let session = SessionStore::open(&config.session_file).with_context(|| {
        format!("failed to open session file {}", config.session_file.display())
    })?;
    let mut state = AppState { config, session };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(dispatch(cli.command, &mut state))
}

async fn dispatch(command: Command, state: &mut AppState) -> Result<()> {
    match command {
        Command::Reset => {
            state.session.reset();
            state.session.checkpoint()?;
            println!("Started a new session in {}", state.session.path().display());
        }
        Command::Center {
            latitude,
            longitude,
        } => {
            state
                .session
                .set_reference_center(GeoFix::new(latitude, longitude))?;
            state.session.checkpoint()?;
            println!("Map center set to {latitude}, {longitude}");
        }
        Command::Map { view } => {
            let view = state.view(view)?;
            let client = MapClient::new(
                state.config.map.clone(),
                state.config.cache_dir.join("maps"),
            );
            let path = client.fetch(&view).await.context("failed to fetch background map")?;
            println!("{}", path.display());
        }
        Command::Walk { max_fixes } => walk(state, max_fixes).await?,
        Command::Render { view, output } => {
            let view = state.view(view)?;
            let path = state.route_cache().render(
                state.session.fixes(),
                &view,
                state.config.line_thickness,
            )?;
            if let Some(output) = output {
                std::fs::copy(&path, &output)
                    .with_context(|| format!("failed to copy render to {}", output.display()))?;
                println!("{}", output.display());
            } else {
                println!("{}", path.display());
            }
        }
        Command::Score {
            reference,
            candidate,
        } => {
            let similarity = similarity::score(&reference, &candidate).with_context(|| {
                format!(
                    "failed to compare {} with {}",
                    reference.display(),
                    candidate.display()
                )
            })?;
            println!("The images are {similarity} similar");
        }
        Command::Compare { drawing, view } => {
            let view = state.view(view)?;
            if state.session.fixes().len() < 2 {
                warn!("Fewer than two fixes recorded; the route render will be blank");
            }
            let route = state.route_cache().render(
                state.session.fixes(),
                &view,
                state.config.line_thickness,
            )?;
            let similarity = similarity::score(&drawing, &route)
                .with_context(|| format!("failed to compare against {}", drawing.display()))?;
            println!("Your walk is {similarity} similar to the drawing");
        }
        Command::Overlay {
            drawing,
            background,
            alpha,
            output,
        } => {
            let background = image::open(&background)
                .with_context(|| format!("failed to open {}", background.display()))?
                .to_rgba8();
            let mut drawing = DrawingImage::open(&drawing)?;
            drawing.fit_to_rect(background.width(), background.height())?;
            drawing.set_alpha(alpha);
            drawing.overlay_on(&background)?.save(&output)?;
            println!("{}", output.display());
        }
    }
    Ok(())
}

async fn walk(state: &mut AppState, max_fixes: Option<usize>) -> Result<()> {
    let receiver_config = state
        .config
        .receiver()
        .context("invalid location receiver configuration")?;
    let mut receiver = GpsReceiver::from_config(&receiver_config)
        .await
        .context("failed to start location receiver")?;

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let summary = walk::record_walk(&mut receiver, &mut state.session, cancel_token, max_fixes)
        .await
        .with_context(|| {
            format!(
                "walk ended with {} fixes saved",
                state.session.fixes().len()
            )
        })?;
    println!(
        "Recorded {} fixes ({} in session)",
        summary.recorded, summary.total
    );
    Ok(())
}
