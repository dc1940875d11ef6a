// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::Path, sync::Arc};

use crate::application::render_service::{default_bindings, RenderService};
use crate::application::sample_source::{clamp_initial_count, SampleSource};
use crate::application::state::{DashboardState, Preset};
use crate::application::stream_service::StreamService;
use crate::application::view_service::ViewService;
use crate::domain::table::WindowOptions;
use crate::infrastructure::config::{load_runtime_config, write_default_config};
use crate::infrastructure::generator::SyntheticSampleGenerator;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulseboard=info,tower_http=info".into()),
        )
        .init();

    // Load configuration, seeding a default file on first run
    if !Path::new("config/runtime.toml").exists() {
        write_default_config("config/runtime.toml")?;
        tracing::info!("wrote default config to config/runtime.toml");
    }
    let config = load_runtime_config()?;
    let preset = Preset::parse(&config.stream.preset).unwrap_or(Preset::Normal);

    // Create the sample source (infrastructure layer)
    let source: Arc<dyn SampleSource> = Arc::new(SyntheticSampleGenerator::new());

    // Seed the shared dashboard state
    let initial_count = clamp_initial_count(config.stream.initial_count);
    let initial = source.initial(initial_count).await?;
    let dashboard = Arc::new(DashboardState::new(initial, preset));

    // Create services (application layer)
    let window_options = WindowOptions {
        row_height: config.table.row_height,
        container_height: config.table.container_height,
        overscan: config.table.overscan,
    };
    let view_service = ViewService::new(dashboard.clone(), window_options);
    let renderer = Arc::new(RenderService::new(
        dashboard.clone(),
        view_service.clone(),
        default_bindings(),
        config.chart.width,
        config.chart.height,
        config.chart.show_grid,
    ));
    let stream_service = Arc::new(StreamService::new(
        dashboard.clone(),
        source.clone(),
        renderer.clone(),
        config.stream.frame_rate_hz,
    ));
    stream_service.start();

    // Create application state
    let state = Arc::new(AppState {
        dashboard,
        view_service,
        stream_service: stream_service.clone(),
        renderer,
        source,
        initial_count,
    });

    // Build router (presentation layer) and start the server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!("starting pulseboard service on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Tear down the session loops before exit
    stream_service.stop();

    Ok(())
}
