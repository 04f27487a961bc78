use crate::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalRisk {
    Low,
    Medium,
    High,
}

impl LegalRisk {
    pub fn label(self) -> &'static str {
        match self {
            LegalRisk::Low => "low",
            LegalRisk::Medium => "medium",
            LegalRisk::High => "high",
        }
    }
}

/// One license table row: how permissive the license is (0..=100), how much
/// legal review it typically demands, and whether it is copyleft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LicenseEntry {
    pub permissiveness: f64,
    pub legal_risk: LegalRisk,
    pub copyleft: bool,
}

/// Static license_id -> entry mapping, loaded once at startup and treated as
/// read-only afterwards. Lookups are case-insensitive on the identifier.
#[derive(Debug, Clone)]
pub struct LicenseTable {
    entries: HashMap<String, (String, LicenseEntry)>,
}

impl LicenseTable {
    /// Table of widely-used SPDX identifiers shipped with the binary.
    /// Config entries extend or override these rows.
    pub fn builtin() -> Self {
        let rows: &[(&str, f64, LegalRisk, bool)] = &[
            ("MIT", 100.0, LegalRisk::Low, false),
            ("Unlicense", 100.0, LegalRisk::Low, false),
            ("0BSD", 100.0, LegalRisk::Low, false),
            ("Apache-2.0", 95.0, LegalRisk::Low, false),
            ("BSD-2-Clause", 95.0, LegalRisk::Low, false),
            ("BSD-3-Clause", 95.0, LegalRisk::Low, false),
            ("ISC", 95.0, LegalRisk::Low, false),
            ("Zlib", 90.0, LegalRisk::Low, false),
            ("MPL-2.0", 70.0, LegalRisk::Medium, true),
            ("EPL-2.0", 65.0, LegalRisk::Medium, true),
            ("CDDL-1.0", 60.0, LegalRisk::Medium, true),
            ("LGPL-2.1", 60.0, LegalRisk::Medium, true),
            ("LGPL-3.0", 60.0, LegalRisk::Medium, true),
            ("EUPL-1.2", 45.0, LegalRisk::High, true),
            ("GPL-2.0", 40.0, LegalRisk::High, true),
            ("GPL-3.0", 40.0, LegalRisk::High, true),
            ("AGPL-3.0", 20.0, LegalRisk::High, true),
        ];

        let mut table = Self {
            entries: HashMap::new(),
        };
        for &(id, permissiveness, legal_risk, copyleft) in rows {
            table.insert(
                id,
                LicenseEntry {
                    permissiveness,
                    legal_risk,
                    copyleft,
                },
            );
        }
        table
    }

    /// Merge config-provided rows over the builtin table.
    pub fn with_overrides(mut self, overrides: &HashMap<String, LicenseEntry>) -> Self {
        for (id, entry) in overrides {
            self.insert(id, *entry);
        }
        self
    }

    fn insert(&mut self, id: &str, entry: LicenseEntry) {
        self.entries
            .insert(id.to_ascii_lowercase(), (id.to_string(), entry));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&LicenseEntry> {
        self.entries
            .get(&id.to_ascii_lowercase())
            .map(|(_, entry)| entry)
    }

    /// The license sub-score is the stored permissiveness, nothing more.
    /// An identifier missing from the table surfaces as `UnknownLicense`;
    /// the caller decides whether that means "missing data" or a hard error.
    pub fn score(&self, id: &str) -> Result<f64> {
        self.entry(id)
            .map(|entry| entry.permissiveness)
            .ok_or_else(|| ScoreError::UnknownLicense(id.to_string()))
    }
}
