//! YAML parsing with error handling

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with nice error messages
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Parse YAML from a file path
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

/// Serialize a value and write it to `path`, replacing any existing file
///
/// Written to a sibling temp file, then renamed into place.
pub fn write_yaml_file<T: Serialize>(path: &Path, value: &T) -> Result<(), YamlError> {
    let yaml = serde_yml::to_string(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        value: f64,
    }

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = "name: plywood\nvalue: 200.5";
        let result: Sample = parse_yaml(yaml, "test.yaml").unwrap();
        assert_eq!(result.name, "plywood");
        assert_eq!(result.value, 200.5);
    }

    #[test]
    fn test_parse_invalid_yaml_returns_syntax_error() {
        let yaml = "name: test\n  invalid indentation";
        let result: Result<Sample, _> = parse_yaml(yaml, "test.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<Sample, _> = parse_yaml_file(Path::new("/nonexistent/x.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sample.jqt.yaml");
        let value = Sample {
            name: "mirror".to_string(),
            value: 92.11,
        };
        write_yaml_file(&path, &value).unwrap();
        let back: Sample = parse_yaml_file(&path).unwrap();
        assert_eq!(back, value);
        assert!(!path.with_extension("yaml.tmp").exists());
    }
}
