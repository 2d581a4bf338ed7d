use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - batch size and concurrency are not 0
/// - encoding has a bitrate and an output extension
/// - art search asks for at least one candidate when enabled
/// - input and output directories differ
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.size == Some(0) {
        return Err(ConfigError::ValidationError(
            "batch.size cannot be 0".to_string(),
        ));
    }

    if config.batch.max_concurrent == Some(0) {
        return Err(ConfigError::ValidationError(
            "batch.max_concurrent cannot be 0".to_string(),
        ));
    }

    let encoding = &config.converter.encoding;
    if encoding.bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "converter.encoding.bitrate_kbps cannot be 0".to_string(),
        ));
    }
    if encoding.extension.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.encoding.extension cannot be empty".to_string(),
        ));
    }

    if config.art.enabled && config.art.max_candidates == 0 {
        return Err(ConfigError::ValidationError(
            "art.max_candidates cannot be 0 while art search is enabled".to_string(),
        ));
    }

    if config.paths.input_dir == config.paths.output_dir {
        return Err(ConfigError::ValidationError(
            "paths.input_dir and paths.output_dir must differ".to_string(),
        ));
    }

    Ok(())
}
