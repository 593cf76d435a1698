// Composition root: wires config, backend and coordinator together

use anyhow::Result;
use clap::Parser;
use gitchest::adapters::{backend::LocalBackend, persistence::FileConfigStore};
use gitchest::cli::{AddArgs, CliArgs, CliCommand};
use gitchest::report::{progress_lines, toast_line};
use gitchest::services::coordinator::SubmissionCoordinator;
use gitchest_core::app::{AddRepoForm, ScreenMode, SubmitError};
use gitchest_core::ports::{AppConfig, ConfigStore, RepoBackend, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOCAL_STEP_DELAY: Duration = Duration::from_millis(150);
const HEALTH_TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config_store = match &args.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new()?,
    };
    let config = config_store.load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Git Chest");

    let ok = match args.command {
        CliCommand::Add(add) => run_add(&config, &add).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_add(config: &AppConfig, add: &AddArgs) -> Result<bool> {
    let backend: Arc<dyn RepoBackend> =
        Arc::new(LocalBackend::new(config.progress_channel.clone(), LOCAL_STEP_DELAY));
    let mut coordinator = SubmissionCoordinator::new(backend, Arc::new(SystemClock), config);
    coordinator.attach();

    let mut form = AddRepoForm::from_defaults(&config.defaults);
    if let Some(url) = &add.url {
        if !coordinator.fill_from_url(&mut form, url) {
            print_toasts(&coordinator);
            return Ok(false);
        }
    }
    add.apply_overrides(&mut form);

    let handle = match coordinator.submit(&form).await {
        Ok(handle) => handle,
        Err(SubmitError::Invalid(errors)) => {
            for field_error in errors {
                eprintln!("{}", field_error);
            }
            return Ok(false);
        }
        Err(e) => {
            error!("Submission failed: {}", e);
            print_toasts(&coordinator);
            return Ok(false);
        }
    };
    info!("Import of {} started as record {}", handle.key, handle.record_id);

    let key = handle.key.clone();
    let mode = coordinator
        .run_until_settled(HEALTH_TICK, |screen| {
            for line in progress_lines(&screen.view(&key)) {
                println!("{}", line);
            }
        })
        .await;

    print_toasts(&coordinator);
    coordinator.teardown();

    Ok(mode == ScreenMode::Done)
}

fn print_toasts(coordinator: &SubmissionCoordinator) {
    for toast in coordinator.screen().toasts().visible() {
        println!("{}", toast_line(toast));
    }
}
