//! VADER-format sentiment lexicon
//!
//! One entry per line, tab separated: `token<TAB>mean valence<TAB>...`.
//! Only the first two fields are used.

use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Load a lexicon file. A missing file is reported with its path.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            PipelineError::LexiconUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let lexicon = Self::parse(&text)?;
        info!("Loaded {} lexicon entries from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut valences = HashMap::new();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or("").trim();
            let valence = fields.next().map(str::trim).unwrap_or("");

            if token.is_empty() {
                return Err(PipelineError::LexiconFormat(format!(
                    "line {}: missing token",
                    idx + 1
                )));
            }

            let valence: f64 = valence.parse().map_err(|_| {
                PipelineError::LexiconFormat(format!(
                    "line {}: invalid valence '{}' for token '{}'",
                    idx + 1,
                    valence,
                    token
                ))
            })?;

            valences.insert(token.to_lowercase(), valence);
        }

        if valences.is_empty() {
            return Err(PipelineError::LexiconFormat(
                "lexicon contains no entries".to_string(),
            ));
        }

        Ok(Self { valences })
    }

    /// Valence for an already-lowercased token.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl FromIterator<(String, f64)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            valences: iter
                .into_iter()
                .map(|(token, valence)| (token.to_lowercase(), valence))
                .collect(),
        }
    }
}
