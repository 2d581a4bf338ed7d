pub mod artwork;
pub mod config;
pub mod converter;
pub mod hasher;
pub mod job;
pub mod metrics;
pub mod scheduler;
pub mod status;
pub mod testing;
pub mod title;

pub use artwork::{
    ArtConfig, ArtError, ArtSearcher, BingImageSearcher, CoverArtResolver, CoverArtState,
    FetchedArt, HttpImageFetcher, ImageFetcher,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, BatchConfig,
    Config, ConfigError, PathsConfig, ReportConfig, StatusMode, TitleConfig,
};
pub use converter::{
    ConversionResult, Converter, ConverterConfig, ConverterError, EncodingProfile,
    FfmpegConverter, LoudnessTarget, StreamKind, TranscodeSpec,
};
pub use hasher::{ContentDigest, ContentHasher, HashError, SeenDigests, Sha256ContentHasher};
pub use job::{FileJob, InputFile, JobContext, JobOutcome, JobResult, JobStage};
pub use scheduler::{
    discover_inputs, partition_batches, BatchReport, BatchScheduler, RunSummary, SchedulerError,
};
pub use status::{stdout_rows, RenderMode, SlotReporter, StatusHandle, StatusRenderer};
pub use title::{clean_title, NoiseWordCleaner, TitleNormalizer};
