use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const NO_EXPLANATION: &str = "Keine weitere Info";

static TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("term pattern is valid"));

/// Piece of a reading text: plain prose or a term with a glossary popover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Plain { text: String },
    Term { word: String, explanation: String },
}

/// Splits `[[word|explanation]]` markup out of `text`.
pub fn parse_annotated(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in TERM_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Plain {
                text: text[last..whole.start()].to_string(),
            });
        }
        let (word, explanation) = match inner.as_str().split_once('|') {
            Some((word, explanation)) => (word, explanation),
            None => (inner.as_str(), NO_EXPLANATION),
        };
        segments.push(Segment::Term {
            word: word.to_string(),
            explanation: explanation.to_string(),
        });
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Plain {
            text: text[last..].to_string(),
        });
    }
    segments
}

/// The text as a student reads it, markup removed
pub fn plain_text(text: &str) -> String {
    parse_annotated(text)
        .into_iter()
        .map(|s| match s {
            Segment::Plain { text } => text,
            Segment::Term { word, .. } => word,
        })
        .collect()
}
