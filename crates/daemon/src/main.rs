// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `curfewd` — the curfew scheduler daemon.

use curfew_daemon::{Config, HookGateway, LifecycleError, Scheduler};
use curfew_store::TaskStore;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("curfewd: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LifecycleError> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.state_dir)?;

    let file_appender = tracing_appender::rolling::never(&config.state_dir, "curfewd.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    // Single instance only; the lock must outlive the loop
    let _lock = config.acquire_lock()?;

    let Some(hook) = config.settings.hook_command.clone() else {
        return Err(LifecycleError::Io(std::io::Error::other(
            "no hook_command configured in settings.toml; \
             the daemon has no way to reach the chat platform",
        )));
    };

    let store = TaskStore::new(&config.schedule_path);
    let mut scheduler = Scheduler::new(
        store,
        HookGateway::new(hook),
        curfew_core::SystemClock,
        config.settings.offset(),
        config.settings.failure_threshold,
    )
    .with_alert_path(&config.alert_path);

    let tick = Duration::from_secs(config.settings.tick_secs.max(1));
    info!(
        schedule = %config.schedule_path.display(),
        tick_secs = tick.as_secs(),
        offset_minutes = config.settings.utc_offset_minutes,
        "curfewd started"
    );

    tokio::select! {
        _ = scheduler.run(tick) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }
    Ok(())
}
