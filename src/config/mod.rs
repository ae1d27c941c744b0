//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<MurmurConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {:?}", path))?;
    let config: MurmurConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is absent
pub fn load_or_default(path: &Path) -> Result<MurmurConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(MurmurConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 44100
  buffer_size: 512

engine:
  volume: 0.4
  chapter: 18
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.engine.volume, 0.4);
        assert_eq!(config.engine.chapter, 18);
        assert_eq!(config.fades.fade_in, 1.0);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"engine:\n  volume: 2.0\n").unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.engine.volume, 0.3);
    }

    #[test]
    fn test_example_config_is_valid() {
        let example = include_str!("../../murmur.example.yaml");
        let config: MurmurConfig = serde_yaml::from_str(example).unwrap();
        assert!(config.validate().is_ok());
    }
}
