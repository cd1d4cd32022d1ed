use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::types::{AnalysisStep, PageEntry, RatingFeedback};

pub const INSTRUCTION_HINT: &str =
    "WICHTIG: BITTE SCHREIBE DEINE ERGEBNISSE UND GEDANKEN IN DEIN HEFT ODER AUF EIN BLATT PAPIER!";

/// Shown in place of a detail view whose steps cannot be found
pub const MISSING_STEPS_MESSAGE: &str = "Fehler beim Laden der Analyseschritte.";

pub const UNKNOWN_ARTIST: &str = "Unbekannt";

const NAPOLEON_JSON: &str = include_str!("../../data/napoleon.json");
const FREIHEIT_JSON: &str = include_str!("../../data/freiheit.json");

/// Built-in paintings, parsed on first use
static NAPOLEON: Lazy<Result<AnalysisContent, String>> =
    Lazy::new(|| parse_builtin(NAPOLEON_JSON, "J.-L. David"));
static FREIHEIT: Lazy<Result<AnalysisContent, String>> =
    Lazy::new(|| parse_builtin(FREIHEIT_JSON, "E. Delacroix"));

/// Steps and rating feedback for one painting
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisContent {
    pub feedback: RatingFeedback,
    pub steps: Vec<AnalysisStep>,
    /// Filled in for the built-in paintings; optional in content files
    #[serde(default)]
    pub artist: String,
}

#[derive(Debug)]
pub enum ContentError {
    MissingSteps { page: String },
    Malformed { file: &'static str, error: String },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::MissingSteps { page } => write!(f, "no analysis steps for page {}", page),
            ContentError::Malformed { file, error } => {
                write!(f, "built-in content {} is malformed: {}", file, error)
            }
        }
    }
}

impl std::error::Error for ContentError {}

fn parse_builtin(json: &str, artist: &str) -> Result<AnalysisContent, String> {
    let mut content: AnalysisContent = serde_json::from_str(json).map_err(|e| e.to_string())?;
    content.artist = artist.to_string();
    Ok(content)
}

fn builtin(file: &'static str, parsed: &Result<AnalysisContent, String>) -> Result<AnalysisContent, ContentError> {
    parsed.clone().map_err(|error| ContentError::Malformed { file, error })
}

/// Analysis content for pages without a built-in painting, keyed by page id
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    entries: HashMap<String, AnalysisContent>,
}

impl ContentRegistry {
    pub fn insert(&mut self, page_id: impl Into<String>, content: AnalysisContent) {
        self.entries.insert(page_id.into(), content);
    }

    /// Resolves the steps for a page: the built-in paintings are recognised by their
    /// path, everything else is looked up by id.
    pub fn content_for(&self, page: &PageEntry) -> Result<AnalysisContent, ContentError> {
        let content = if page.path.contains("napoleon") {
            builtin("napoleon.json", &NAPOLEON)?
        } else if page.path.contains("freiheit") {
            builtin("freiheit.json", &FREIHEIT)?
        } else {
            let mut content = self
                .entries
                .get(&page.id)
                .cloned()
                .ok_or_else(|| ContentError::MissingSteps { page: page.id.clone() })?;
            if content.artist.is_empty() {
                content.artist = UNKNOWN_ARTIST.to_string();
            }
            content
        };

        if content.steps.is_empty() {
            return Err(ContentError::MissingSteps { page: page.id.clone() });
        }
        Ok(content)
    }
}

/// Reads `<page-id>.json` analysis files for pages beyond the built-in paintings.
/// Unreadable or malformed files are skipped with a warning.
pub fn load_content_dir(dir: Option<&Path>) -> ContentRegistry {
    let mut registry = ContentRegistry::default();
    let Some(dir) = dir else {
        return registry;
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read content directory {} ({})", dir.display(), e);
            return registry;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(page_id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<AnalysisContent>(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(content) => registry.insert(page_id, content),
            Err(e) => warn!("Skipping {} ({})", path.display(), e),
        }
    }

    info!("Loaded analysis content for {} pages from {}", registry.entries.len(), dir.display());
    registry
}
