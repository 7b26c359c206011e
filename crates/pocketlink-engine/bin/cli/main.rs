mod cli;
mod render;

use crate::cli::{Command, GeneratorArg, StorageBackendArg, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use pocketlink_core::{ClickOutcome, RecordRepository, ShortenForm};
use pocketlink_engine::tasks::{follow_short_link, run_sweeper};
use pocketlink_engine::{Dashboard, Engine, EngineSettings};
use pocketlink_generator::{Generator, RandomGenerator, SeqGenerator};
use pocketlink_storage::{FileStore, JsonRecordRepository, MemoryStore};
use pocketlink_telemetry::{LogBuffer, TelemetrySettings};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type CliEngine = Engine<Arc<dyn RecordRepository>, Box<dyn Generator>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let logs = pocketlink_telemetry::init(
        &TelemetrySettings::builder()
            .format(config.log_format.into())
            .default_level(config.log_level.clone())
            .build(),
    )?;

    info!(
        component = "cli",
        storage_backend = %config.storage,
        generator = %config.generator,
        base_url = %config.base_url,
        "starting pocketlink"
    );

    let engine = build_engine(&config)?;
    let result = run(&engine, config.command).await;

    if config.show_logs {
        print_logs(&logs);
    }

    result
}

fn build_engine(config: &CLI) -> anyhow::Result<CliEngine> {
    let repository: Arc<dyn RecordRepository> = match config.storage {
        StorageBackendArg::File => {
            let store = FileStore::open(&config.data_dir).with_context(|| {
                format!("failed to open data directory {}", config.data_dir.display())
            })?;
            Arc::new(JsonRecordRepository::new(store))
        }
        StorageBackendArg::InMemory => Arc::new(JsonRecordRepository::new(MemoryStore::new())),
    };

    let generator: Box<dyn Generator> = match config.generator {
        GeneratorArg::Random => Box::new(RandomGenerator::new()),
        GeneratorArg::Seq => {
            let records = repository.load_all();
            let existing = records.iter().map(|r| r.short_code.as_str());
            Box::new(SeqGenerator::resume(&config.generator_prefix, existing)?)
        }
    };

    let settings = EngineSettings::builder()
        .base_url(config.base_url.clone())
        .build();

    Ok(Engine::new(repository, settings).with_generator(generator))
}

async fn run(engine: &CliEngine, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Shorten {
            urls,
            minutes,
            code,
        } => shorten(engine, urls, minutes, code),
        Command::List => {
            print!("{}", render::url_table(&engine.list_all()));
            Ok(())
        }
        Command::Stats { json } => {
            let dashboard = Dashboard::new(engine.list_all());
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print!("{}", render::dashboard(&dashboard));
            }
            Ok(())
        }
        Command::Open {
            code,
            delay_ms,
            user_agent,
        } => {
            println!("Redirecting...");
            let outcome =
                follow_short_link(engine, &code, &user_agent, Duration::from_millis(delay_ms))
                    .await?;
            match outcome {
                ClickOutcome::Redirect { original_url } => {
                    println!("{original_url}");
                    Ok(())
                }
                failed => bail!(failed.failure_reason().unwrap_or("redirect failed")),
            }
        }
        Command::Purge => {
            let removed = engine.purge_expired()?;
            println!("Removed {removed} expired URL(s)");
            Ok(())
        }
        Command::Sweep { interval_secs } => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(component = "cli", error = %e, "failed to listen for Ctrl-C");
                }
            };
            let removed =
                run_sweeper(engine, Duration::from_secs(interval_secs), shutdown).await;
            println!("Removed {removed} expired URL(s)");
            Ok(())
        }
    }
}

fn shorten(
    engine: &CliEngine,
    urls: Vec<String>,
    minutes: Option<String>,
    code: Option<String>,
) -> anyhow::Result<()> {
    if code.is_some() && urls.len() > 1 {
        bail!("--code can only be used with a single URL");
    }

    let total = urls.len();
    let mut failed = 0;
    for url in urls {
        let mut form = ShortenForm::new(url.clone());
        if let Some(minutes) = &minutes {
            form = form.validity_minutes(minutes.clone());
        }
        if let Some(code) = &code {
            form = form.custom_shortcode(code.clone());
        }

        let params = match form.validate() {
            Ok(params) => params,
            Err(errors) => {
                failed += 1;
                eprint!("{}", render::field_errors(&url, &errors));
                continue;
            }
        };

        match engine.shorten(params) {
            Ok(view) => print!("{}", render::created(&view)),
            Err(e) => {
                failed += 1;
                eprintln!("{url}: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} URL(s) could not be shortened");
    }
    Ok(())
}

fn print_logs(logs: &LogBuffer) {
    println!();
    println!("Logs ({} entries)", logs.len());
    for entry in logs.entries() {
        println!("{}", render::log_line(&entry));
    }
}
