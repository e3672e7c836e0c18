//! The data manifest: which question files exist and how they group into
//! named profiles.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::parser::ValidationWarning;

/// Reserved profile name that always selects every file.
pub const ALL_PROFILE: &str = "all";

/// Default manifest file name inside a data source.
pub const DEFAULT_MANIFEST: &str = "manifest.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Every question file, in load order.
    #[serde(default)]
    pub files: Vec<String>,
    /// Named subsets of `files`.
    #[serde(default)]
    pub profiles: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    /// Parse a manifest. `source` names the file in errors.
    pub fn from_json(content: &str, source: &str) -> Result<Self, LoadError> {
        serde_json::from_str(content).map_err(|e| LoadError::Manifest {
            file: source.to_string(),
            source: e,
        })
    }

    /// Files that make up `profile`, in the order they should be loaded.
    pub fn resolve_profile(&self, profile: &str) -> Result<&[String], LoadError> {
        if profile == ALL_PROFILE {
            return Ok(&self.files);
        }
        self.profiles
            .get(profile)
            .map(Vec::as_slice)
            .ok_or_else(|| LoadError::UnknownProfile(profile.to_string()))
    }

    /// `"all"` followed by the declared profiles in name order.
    pub fn profile_names(&self) -> Vec<&str> {
        std::iter::once(ALL_PROFILE)
            .chain(
                self.profiles
                    .keys()
                    .map(String::as_str)
                    .filter(|name| *name != ALL_PROFILE),
            )
            .collect()
    }

    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.as_str()) {
                warnings.push(ValidationWarning {
                    question_id: None,
                    message: format!("file listed twice: {file}"),
                });
            }
        }

        if self.profiles.contains_key(ALL_PROFILE) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: "profile \"all\" is reserved; the declared one is ignored".into(),
            });
        }

        for (name, files) in &self.profiles {
            for file in files {
                if !seen.contains(file.as_str()) {
                    warnings.push(ValidationWarning {
                        question_id: None,
                        message: format!("profile {name} references unlisted file: {file}"),
                    });
                }
            }
        }

        warnings
    }
}
