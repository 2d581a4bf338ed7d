use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `TUNEPRESS_BATCH__SIZE=4`.
pub const ENV_PREFIX: &str = "TUNEPRESS_";

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    base_figment()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Like [`load_config`], but a missing file means "defaults plus environment".
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    base_figment()
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusMode;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("./Music"));
        assert_eq!(config.paths.output_dir, PathBuf::from("./Converted"));
        assert_eq!(config.batch.size, None);
        assert_eq!(config.batch.status, StatusMode::Auto);
        assert_eq!(config.converter.encoding.bitrate_kbps, 128);
    }

    #[test]
    fn test_load_config_from_str_sections() {
        let toml = r#"
[paths]
input_dir = "/music/in"

[batch]
size = 5
max_concurrent = 2
status = "plain"

[converter.encoding.loudness]
integrated_lufs = -16.0
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("/music/in"));
        assert_eq!(config.batch.size, Some(5));
        assert_eq!(config.batch.concurrency_limit(), 2);
        assert_eq!(config.batch.status, StatusMode::Plain);
        assert_eq!(config.converter.encoding.loudness.integrated_lufs, -16.0);
        assert_eq!(config.converter.encoding.loudness.true_peak_db, -1.5);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let result = load_config_from_str("[batch]\nsize = \"many\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/tunepress.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default(Path::new("/nonexistent/tunepress.toml")).unwrap();
        assert_eq!(config.converter.encoding.extension, "m4a");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[paths]
output_dir = "/srv/converted"

[art]
enabled = false
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("/srv/converted"));
        assert!(!config.art.enabled);
        // Untouched sections keep their defaults
        assert_eq!(config.paths.input_dir, PathBuf::from("./Music"));
    }

    #[test]
    fn test_env_overrides_nest_with_double_underscore() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TUNEPRESS_BATCH__SIZE", "4");
            jail.set_env("TUNEPRESS_CONVERTER__ENCODING__BITRATE_KBPS", "256");

            let config = load_config_or_default(Path::new("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.batch.size, Some(4));
            assert_eq!(config.converter.encoding.bitrate_kbps, 256);
            assert_eq!(config.converter.encoding.extension, "m4a");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "tunepress.toml",
                r#"
[batch]
size = 10
max_concurrent = 3
"#,
            )?;
            jail.set_env("TUNEPRESS_BATCH__SIZE", "2");

            let config =
                load_config(Path::new("tunepress.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.batch.size, Some(2));
            assert_eq!(config.batch.concurrency_limit(), 3);
            Ok(())
        });
    }
}
