use crate::scoring::{LicenseEntry, Weights};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration file.
///
/// Everything has a usable default: with no config file at all the engine
/// runs with equal dimension weights and the builtin license table.
///
/// Example YAML:
/// ```yaml
/// weights:
///   popularity: 0.15
///   community: 0.35
///   security: 0.15
///   license: 0.10
///   versioning: 0.25
/// licenses:
///   WTFPL: { permissiveness: 100, legal_risk: low, copyleft: false }
/// scores_path: /var/lib/oss-vitals/scores.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub weights: Weights,

    /// License table rows that extend or override the builtin table.
    #[serde(default)]
    pub licenses: HashMap<String, LicenseEntry>,

    /// Where score records are persisted. Defaults to scores.json next to
    /// the config file.
    #[serde(default)]
    pub scores_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.weights, Weights::default());
        assert!(config.licenses.is_empty());
        assert!(config.scores_path.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
weights:
  popularity: 0.15
  community: 0.35
  security: 0.15
  license: 0.10
  versioning: 0.25
licenses:
  WTFPL: { permissiveness: 100, legal_risk: low, copyleft: false }
  CERN-OHL-S-2.0: { permissiveness: 35, legal_risk: high, copyleft: true }
scores_path: /tmp/scores.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.weights.community, 0.35);
        assert_eq!(config.licenses.len(), 2);
        assert!(config.licenses["CERN-OHL-S-2.0"].copyleft);
        assert_eq!(config.scores_path, Some(PathBuf::from("/tmp/scores.json")));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_saphyr::from_str::<Config>("wieghts: {}").is_err());
    }
}
