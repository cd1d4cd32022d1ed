use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::annotated::plain_text;
use super::content::AnalysisContent;
use super::exercise::{Exercise, Rating};
use super::types::PageEntry;

/// Index of the step whose reading text is reprinted as historical context
const CONTEXT_STEP: usize = 2;

/// Verdict line when no rating has been chosen yet
pub const NO_RATING: &str = "Noch keine Bewertung erfolgt";
/// Shown in place of the feedback when no rating has been chosen yet
pub const NO_RATING_PROMPT: &str =
    "Führen Sie die 5 Schritte der Analyse durch, um hier eine automatisierte Bewertung zu erhalten.";
pub const NO_CONTEXT: &str = "Hier wurde kein Kontext-Text für die Analyse hinterlegt.";

/// Headline of the source-criticism result for a rating
pub fn verdict(rating: Option<Rating>) -> &'static str {
    match rating {
        Some(Rating::Red) => "Kritisch - Inszenierung",
        Some(Rating::Yellow) => "Teilweise glaubwürdig",
        Some(Rating::Green) => "Glaubwürdige Darstellung",
        None => NO_RATING,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintStep {
    pub number: u8,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    pub points: Vec<String>,
}

/// Static, non-interactive summary of an exercise for paper or PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSheet {
    pub title: String,
    pub artist: String,
    pub year: String,
    /// Empty when the page has no image
    pub image_url: String,
    /// German short date, e.g. "2.9.2024"
    pub date: String,
    pub steps: Vec<PrintStep>,
    /// Reading text of the context step with glossary markup removed
    pub context: Option<String>,
    pub rating: Option<Rating>,
    pub verdict: String,
    /// Feedback for the chosen rating, or the prompt to finish the analysis
    pub assessment: String,
}

impl PrintSheet {
    /// Works from whatever state the exercise is in, including an untouched one.
    pub fn build(page: &PageEntry, content: &AnalysisContent, exercise: &Exercise, today: NaiveDate) -> Self {
        let steps = content
            .steps
            .iter()
            .map(|s| PrintStep {
                number: s.number,
                icon: s.icon.clone(),
                title: s.title.clone(),
                subtitle: s.subtitle.clone(),
                points: s.points.iter().map(|p| plain_text(p)).collect(),
            })
            .collect();

        let context = content
            .steps
            .get(CONTEXT_STEP)
            .and_then(|s| s.context_text.as_deref())
            .map(plain_text)
            .filter(|text| !text.trim().is_empty());

        PrintSheet {
            title: page.title.clone(),
            artist: content.artist.clone(),
            year: page.year.to_string(),
            image_url: page.image_url.clone(),
            date: format!("{}.{}.{}", today.day(), today.month(), today.year()),
            steps,
            context,
            rating: exercise.rating,
            verdict: verdict(exercise.rating).to_string(),
            assessment: exercise
                .feedback(content)
                .unwrap_or(NO_RATING_PROMPT)
                .to_string(),
        }
    }
}
