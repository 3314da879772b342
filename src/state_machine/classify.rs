//! Keyword classification of yes/no answers
//!
//! Matching is case-insensitive substring search, nothing more.

const GREETING_YES: [&str; 4] = ["yes", "sure", "ok", "yeah"];
const GREETING_NO: [&str; 2] = ["no", "not"];
const CONFIRM_YES: [&str; 3] = ["yes", "confirm", "correct"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Affirmative,
    Negative,
    Unclear,
}

/// Classify a reply to "would you like to order?"
///
/// Affirmative keywords win when both kinds appear.
pub fn classify_greeting(utterance: &str) -> Answer {
    let input = normalize(utterance);
    if contains_any(&input, &GREETING_YES) {
        Answer::Affirmative
    } else if contains_any(&input, &GREETING_NO) {
        Answer::Negative
    } else {
        Answer::Unclear
    }
}

/// Classify a reply to the order summary. Anything not affirmative counts
/// as a no.
pub fn classify_confirmation(utterance: &str) -> Answer {
    if contains_any(&normalize(utterance), &CONFIRM_YES) {
        Answer::Affirmative
    } else {
        Answer::Negative
    }
}

fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

fn contains_any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| input.contains(k))
}
