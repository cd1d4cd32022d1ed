use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::content::AnalysisContent;
use super::types::AnalysisStep;

/// Index of the source-credibility step, the one with the traffic light
pub const RATING_STEP: usize = 4;

/// Traffic-light credibility rating chosen in the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Red,
    Yellow,
    Green,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Red, Rating::Yellow, Rating::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Red => "red",
            Rating::Yellow => "yellow",
            Rating::Green => "green",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Red => "ROT",
            Rating::Yellow => "GELB",
            Rating::Green => "GRÜN",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" | "rot" => Ok(Rating::Red),
            "yellow" | "gelb" => Ok(Rating::Yellow),
            "green" | "grün" | "gruen" => Ok(Rating::Green),
            other => Err(format!("unknown rating {:?}", other)),
        }
    }
}

/// A student's progress through one painting. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub active_step: usize,
    pub rating: Option<Rating>,
    pub show_hints: bool,
    pub show_writing_help: bool,
}

impl Exercise {
    pub fn new() -> Self {
        Self::default()
    }

    /// The step on screen; an out-of-range index shows the first step.
    pub fn current_step<'a>(&self, content: &'a AnalysisContent) -> Option<&'a AnalysisStep> {
        content.steps.get(self.active_step).or_else(|| content.steps.first())
    }

    pub fn next(&mut self, content: &AnalysisContent) {
        if self.active_step + 1 < content.steps.len() {
            self.active_step += 1;
        }
    }

    pub fn previous(&mut self) {
        self.active_step = self.active_step.saturating_sub(1);
    }

    pub fn goto(&mut self, step: usize, content: &AnalysisContent) {
        if step < content.steps.len() {
            self.active_step = step;
        }
    }

    pub fn choose(&mut self, rating: Rating) {
        self.rating = Some(rating);
    }

    pub fn toggle_hints(&mut self) {
        self.show_hints = !self.show_hints;
    }

    pub fn toggle_writing_help(&mut self) {
        self.show_writing_help = !self.show_writing_help;
    }

    pub fn is_rating_step(&self) -> bool {
        self.active_step == RATING_STEP
    }

    pub fn is_last_step(&self, content: &AnalysisContent) -> bool {
        self.active_step + 1 >= content.steps.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.active_step > 0
    }

    /// Label of the forward button
    pub fn forward_label(&self) -> &'static str {
        if self.active_step < RATING_STEP {
            "Weiter"
        } else {
            "Analyse abschließen & Drucken"
        }
    }

    /// Feedback text for the chosen rating, if any
    pub fn feedback<'a>(&self, content: &'a AnalysisContent) -> Option<&'a str> {
        self.rating.map(|r| match r {
            Rating::Red => content.feedback.red.as_str(),
            Rating::Yellow => content.feedback.yellow.as_str(),
            Rating::Green => content.feedback.green.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::content::ContentRegistry;
    use crate::gallery::types::Catalog;

    fn napoleon() -> AnalysisContent {
        ContentRegistry::default().content_for(&Catalog::default().pages[0]).unwrap()
    }

    #[test]
    fn test_navigation_is_bounded() {
        let content = napoleon();
        let mut exercise = Exercise::new();
        assert!(!exercise.can_go_back());
        exercise.previous();
        assert_eq!(exercise.active_step, 0);

        for _ in 0..10 {
            exercise.next(&content);
        }
        assert_eq!(exercise.active_step, 4);
        assert!(exercise.is_last_step(&content));
        assert!(exercise.is_rating_step());
        assert_eq!(exercise.forward_label(), "Analyse abschließen & Drucken");

        exercise.goto(9, &content);
        assert_eq!(exercise.active_step, 4);
        exercise.goto(2, &content);
        assert_eq!(exercise.current_step(&content).unwrap().title, "KONTEXT");
        assert_eq!(exercise.forward_label(), "Weiter");
    }

    #[test]
    fn test_out_of_range_step_shows_first() {
        let content = napoleon();
        let exercise = Exercise {
            active_step: 42,
            ..Exercise::default()
        };
        assert_eq!(exercise.current_step(&content).unwrap().number, 1);
    }

    #[test]
    fn test_feedback_follows_choice() {
        let content = napoleon();
        let mut exercise = Exercise::new();
        assert!(exercise.feedback(&content).is_none());
        exercise.choose(Rating::Red);
        assert!(exercise.feedback(&content).unwrap().starts_with("ROT"));
        exercise.choose("gelb".parse().unwrap());
        assert!(exercise.feedback(&content).unwrap().starts_with("GELB"));
    }

    #[test]
    fn test_toggles() {
        let mut exercise = Exercise::new();
        exercise.toggle_hints();
        exercise.toggle_writing_help();
        exercise.toggle_hints();
        assert!(!exercise.show_hints);
        assert!(exercise.show_writing_help);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!("GREEN".parse::<Rating>(), Ok(Rating::Green));
        assert_eq!("grün".parse::<Rating>(), Ok(Rating::Green));
        assert!("blau".parse::<Rating>().is_err());
        assert_eq!(Rating::Yellow.to_string(), "yellow");
    }
}
