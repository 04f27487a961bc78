use serde::{Deserialize, Serialize};

/// Top-level dimension weights for the composite score.
///
/// Defaults give every dimension an equal 0.2 share. The weights must sum
/// to 1 across the five dimensions; when a project is missing a dimension,
/// the engine renormalizes over the ones that are present.
///
/// Example YAML:
/// ```yaml
/// weights:
///   popularity: 0.15
///   community: 0.35
///   security: 0.15
///   license: 0.10
///   versioning: 0.25
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    #[serde(default = "default_weight")]
    pub popularity: f64,
    #[serde(default = "default_weight")]
    pub community: f64,
    #[serde(default = "default_weight")]
    pub security: f64,
    #[serde(default = "default_weight")]
    pub license: f64,
    #[serde(default = "default_weight")]
    pub versioning: f64,
}

fn default_weight() -> f64 {
    0.2
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            popularity: 0.2,
            community: 0.2,
            security: 0.2,
            license: 0.2,
            versioning: 0.2,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.popularity + self.community + self.security + self.license + self.versioning
    }

    /// (name, weight) pairs in the order dimensions are reported.
    pub fn as_pairs(&self) -> [(&'static str, f64); 5] {
        [
            ("popularity", self.popularity),
            ("community", self.community),
            ("security", self.security),
            ("license", self.license),
            ("versioning", self.versioning),
        ]
    }
}
