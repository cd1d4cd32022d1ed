use serde::{Deserialize, Serialize};

/// One painting in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Navigation key, matched against the location fragment
    pub path: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    pub year: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub focus_tag: String,
    /// 1 (easy) to 3
    pub difficulty: u8,
    pub short_text: String,
    /// Id of a page to compare this one with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_target: Option<String>,
}

/// Gallery configuration, as found in `pages.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub title: String,
    pub subtitle: String,
    pub pages: Vec<PageEntry>,
}

/// One of the five steps of an image analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStep {
    pub number: u8,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub points: Vec<String>,
    pub hints: Vec<String>,
    pub sentence_starters: Vec<String>,
    /// Reading text for the context step, may contain `[[word|explanation]]` markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_text: Option<String>,
}

/// Teacher feedback for each credibility rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingFeedback {
    pub red: String,
    pub yellow: String,
    pub green: String,
}
