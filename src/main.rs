#![deny(
    unused_import_braces,
    unused_lifetimes,
    unreachable_pub,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_copy_implementations,
    deprecated_in_future,
    meta_variable_misuse,
    non_ascii_idents,
    rust_2018_compatibility,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style,
    clippy::all
)]
#![warn(variant_size_differences, let_underscore_drop)]

//! # Dropcam

pub mod cli_options;
pub mod config;
pub mod logger;
pub mod setup;

use crate::{
    cli_options::{
        CliOptions,
        EventsOptions,
        SetPropertyOptions,
        SnapshotOptions,
        Subcommand,
    },
    config::Config,
};
use anyhow::{
    bail,
    Context as _,
};
use dropcam::{
    Camera,
    Client,
};
use std::{
    sync::Arc,
    time::Duration,
};
use tokio::runtime::Builder as RuntimeBuilder;
use tracing::{
    error,
    info,
};
use tracing_appender::non_blocking::WorkerGuard;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Data from the setup function
struct SetupData {
    tokio_rt: tokio::runtime::Runtime,
    config: Arc<Config>,
    subcommand: Subcommand,
    worker_guard: Option<WorkerGuard>,
}

/// Pre-main setup
fn setup(cli_options: CliOptions) -> anyhow::Result<SetupData> {
    eprintln!("starting tokio runtime...");
    let tokio_rt = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .thread_name("dropcam-tokio-worker")
        .build()
        .context("failed to start tokio runtime")?;

    let config = setup::load_config(&cli_options.config)
        .map(Arc::new)
        .context("failed to load config")?;

    // Everything past here is assumed to need tokio
    let _enter_guard = tokio_rt.handle().enter();

    eprintln!("setting up logger...");
    let worker_guard = logger::setup(&config).context("failed to initialize logger")?;

    eprintln!();
    Ok(SetupData {
        tokio_rt,
        config,
        subcommand: cli_options.subcommand.unwrap_or_default(),
        worker_guard,
    })
}

/// The main entry.
///
/// Sets up the program and calls `real_main`.
/// Setup errors go to the stderr, as the loggers are not initialized yet.
fn main() -> anyhow::Result<()> {
    // This line MUST run first.
    // It is needed to exit early if the options are invalid,
    // and this will NOT run destructors if it does so.
    let cli_options = argh::from_env();

    let setup_data = setup(cli_options)?;
    real_main(setup_data);
    Ok(())
}

/// The actual entry point.
///
/// Errors are printed to the stdout, and the process still exits normally.
fn real_main(setup_data: SetupData) {
    let result = setup_data
        .tokio_rt
        .block_on(async_main(setup_data.config, setup_data.subcommand));

    if let Err(error) = result {
        error!("{error:?}");
        println!("{error:#}");
    }

    drop(setup_data.worker_guard);
}

/// The async entry
async fn async_main(config: Arc<Config>, subcommand: Subcommand) -> anyhow::Result<()> {
    let client = build_client(&config)?;

    match subcommand {
        Subcommand::Snapshot(options) => snapshot(&config, &client, options).await,
        Subcommand::List(_options) => {
            let cameras = client
                .list_cameras()
                .await
                .context("failed to list cameras")?;
            for (i, camera) in cameras.iter().enumerate() {
                println!("{i}: {} ({})", camera.title(), camera.uuid());
            }

            Ok(())
        }
        Subcommand::Events(options) => events(&config, &client, options).await,
        Subcommand::SetProperty(options) => set_property(&client, options).await,
    }
}

/// Make a client from the config
fn build_client(config: &Config) -> anyhow::Result<Client> {
    let (username, password) = config.credentials().context("missing credentials")?;
    let endpoints = config.endpoints().context("invalid endpoints")?;
    let http_client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.timeout())
        .build()
        .context("failed to build http client")?;

    Ok(Client::with_client(
        http_client,
        username,
        password,
        endpoints,
    ))
}

/// Save an image from every camera, then print each camera's recent events.
async fn snapshot(
    config: &Config,
    client: &Client,
    options: SnapshotOptions,
) -> anyhow::Result<()> {
    let out_dir = options.out_dir.as_deref().unwrap_or(&config.out_dir);
    let width = options.width.unwrap_or(config.image_width);

    let cameras = client
        .list_cameras()
        .await
        .context("failed to list cameras")?;
    info!("found {} cameras", cameras.len());

    tokio::fs::create_dir_all(out_dir)
        .await
        .context("failed to create out dir")?;

    for (i, camera) in cameras.iter().enumerate() {
        let path = out_dir.join(format!("{i}.jpg"));
        println!("saving `{}` to '{path}'...", camera.title());
        if let Err(error) = camera.save_image(&path, width, options.time).await {
            println!("  failed to save image: {error}");
        }
    }
    println!();

    let start = now().saturating_sub(window_secs(config.event_window));
    for camera in cameras.iter() {
        print_events(camera, start).await?;
    }

    Ok(())
}

/// Print the events of one camera
async fn events(config: &Config, client: &Client, options: EventsOptions) -> anyhow::Result<()> {
    let camera = find_camera(client, &options.camera).await?;
    let since = options.since.unwrap_or(config.event_window);
    print_events(&camera, now().saturating_sub(window_secs(since))).await
}

/// Set a property on one camera
async fn set_property(client: &Client, options: SetPropertyOptions) -> anyhow::Result<()> {
    let camera = find_camera(client, &options.camera).await?;
    camera
        .set_property(&options.name, &options.value)
        .await
        .context("failed to set property")?;
    println!(
        "sent `{}` = `{}` to `{}`",
        options.name,
        options.value,
        camera.title()
    );

    Ok(())
}

async fn print_events(camera: &Camera, start: i64) -> anyhow::Result<()> {
    let events = camera
        .list_events(start, None)
        .await
        .with_context(|| format!("failed to list events for `{}`", camera.title()))?;

    println!("{} ({} events):", camera.title(), events.len());
    for event in events.iter() {
        let kind = event.kind.as_deref().unwrap_or("unknown");
        println!("  {} @ {}: {kind}", event.id, event.time);
    }
    println!();

    Ok(())
}

/// Find a camera by list index or uuid
async fn find_camera(client: &Client, selector: &str) -> anyhow::Result<Camera> {
    let mut cameras = client
        .list_cameras()
        .await
        .context("failed to list cameras")?;

    if let Ok(index) = selector.parse::<usize>() {
        if index < cameras.len() {
            return Ok(cameras.swap_remove(index));
        }
    }

    match cameras.into_iter().find(|camera| camera.uuid() == selector) {
        Some(camera) => Ok(camera),
        None => bail!("no camera matches `{selector}`"),
    }
}

fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

fn window_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}
