use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunepress_core::{
    discover_inputs, load_config_or_default, metrics, stdout_rows, validate_config,
    BatchScheduler, BingImageSearcher, Config, Converter, CoverArtResolver, FfmpegConverter,
    HttpImageFetcher, JobContext, NoiseWordCleaner, RenderMode, RunSummary, StatusRenderer,
};

/// Exit status after Ctrl+C.
const EXIT_INTERRUPTED: u8 = 130;

enum RunExit {
    Completed,
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout belongs to the status display, and lines
    // interleaved on the same terminal would shift its in-place redraws
    let default_filter = if std::io::stderr().is_terminal() {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(RunExit::Completed) => ExitCode::SUCCESS,
        Ok(RunExit::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunExit> {
    // Determine config path
    let config_path = std::env::var("TUNEPRESS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("tunepress.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    // Fail before any output if the tools are missing
    let converter = Arc::new(FfmpegConverter::new(config.converter.clone()));
    converter
        .validate()
        .await
        .context("ffmpeg/ffprobe are not usable")?;

    let inputs = discover_inputs(&config.paths.input_dir)
        .await
        .context("Failed to list input files")?;
    info!(
        "Found {} files in {:?}",
        inputs.len(),
        config.paths.input_dir
    );

    tokio::fs::create_dir_all(&config.paths.output_dir)
        .await
        .with_context(|| format!("Failed to create output dir {:?}", config.paths.output_dir))?;
    tokio::fs::create_dir_all(&config.paths.temp_dir)
        .await
        .with_context(|| format!("Failed to create temp dir {:?}", config.paths.temp_dir))?;

    let context = build_job_context(&config, converter)?;

    let (status, renderer) =
        StatusRenderer::new(std::io::stdout(), RenderMode::for_stdout(config.batch.status))
            .with_terminal_rows(stdout_rows())
            .spawn();

    let scheduler = BatchScheduler::new(context, status)
        .with_batch_size(config.batch.size)
        .with_max_concurrent(config.batch.concurrency_limit());

    let summary = tokio::select! {
        summary = scheduler.run(inputs) => summary,
        _ = interrupt_signal() => {
            warn!("Interrupted, abandoning remaining jobs");
            return Ok(RunExit::Interrupted);
        }
    };

    if let Err(e) = renderer.await {
        warn!("Status renderer ended abnormally: {}", e);
    }

    for failed in summary.failures() {
        info!("{}", failed);
    }

    write_reports(&config, &summary).await?;
    Ok(RunExit::Completed)
}

fn build_job_context(config: &Config, converter: Arc<FfmpegConverter>) -> Result<JobContext> {
    let normalizer = NoiseWordCleaner::with_extra_words(&config.title.extra_noise_words);

    let mut context = JobContext::new(&config.paths.output_dir, converter)
        .with_normalizer(Arc::new(normalizer))
        .with_encoding(config.converter.encoding.clone())
        .with_probe_timeout(config.converter.probe_timeout());

    if config.art.enabled {
        let searcher =
            BingImageSearcher::new(config.art.clone()).context("Failed to create art searcher")?;
        let fetcher =
            HttpImageFetcher::new(&config.art).context("Failed to create image fetcher")?;
        let resolver = CoverArtResolver::new(
            Arc::new(searcher),
            Arc::new(fetcher),
            config.art.clone(),
            &config.paths.temp_dir,
        );
        context = context.with_resolver(Arc::new(resolver));
    } else {
        info!("Cover art lookup disabled");
    }

    Ok(context)
}

async fn write_reports(config: &Config, summary: &RunSummary) -> Result<()> {
    if let Some(path) = &config.report.summary_path {
        let json = serde_json::to_string_pretty(summary).context("Failed to encode summary")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Wrote run summary to {:?}", path);
    }

    if let Some(path) = &config.report.metrics_path {
        tokio::fs::write(path, metrics::render())
            .await
            .with_context(|| format!("Failed to write metrics to {:?}", path))?;
        info!("Wrote metrics to {:?}", path);
    }

    Ok(())
}

/// Wait for Ctrl+C (or SIGTERM)
async fn interrupt_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
