use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::artwork::ArtConfig;
use crate::converter::ConverterConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub art: ArtConfig,
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input, output and scratch directories
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory scanned (non-recursively) for input files.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory converted files are written to. Created if absent.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for fetched cover art while a job is running.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./Music")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./Converted")
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("tunepress")
}

/// Batch partitioning and concurrency
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Files per batch. `None` puts every discovered file in one batch.
    #[serde(default)]
    pub size: Option<usize>,
    /// Concurrent jobs within a batch. `None` uses the host's available parallelism.
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    #[serde(default)]
    pub status: StatusMode,
}

impl BatchConfig {
    /// Resolves the concurrency ceiling.
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrent.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// How the status region is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMode {
    /// In-place ANSI updates when stdout is a terminal, plain lines otherwise.
    #[default]
    Auto,
    Ansi,
    Plain,
}

/// Title normalisation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TitleConfig {
    /// Extra words stripped from titles on top of the built-in noise list.
    #[serde(default)]
    pub extra_noise_words: Vec<String>,
}

/// Run reports
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Where to write the JSON run summary.
    #[serde(default)]
    pub summary_path: Option<PathBuf>,
    /// Where to write a Prometheus text dump of the run metrics.
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}
