//! Rebuild punctuated, capitalized text from per-slot label predictions.

use crate::labels::{is_trailing_punctuation, PunctLabel};

/// Terminator appended when the text does not already end in punctuation.
const DEFAULT_TERMINATOR: char = '.';

/// Reconstruct text from `words` and the model's label sequence.
///
/// `predictions[i + 1]` belongs to `words[i]`; slot 0 is the BOS position.
/// Missing, negative or unknown labels mean "no punctuation". The first word
/// and every word following `.`, `?` or `!` is capitalized.
pub fn reconstruct<S: AsRef<str>>(words: &[S], predictions: &[i64]) -> String {
    if words.is_empty() {
        return String::new();
    }

    let mut result = String::new();
    let mut should_capitalize = true;

    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }

        let word = word.as_ref();
        if should_capitalize {
            push_capitalized(&mut result, word);
        } else {
            result.push_str(word);
        }
        should_capitalize = false;

        let label = predictions
            .get(i + 1)
            .and_then(|&p| usize::try_from(p).ok())
            .and_then(PunctLabel::from_id)
            .unwrap_or(PunctLabel::None);

        if let Some(punct) = label.as_char() {
            result.push(punct);
            should_capitalize = label.is_sentence_end();
        }
    }

    if let Some(last) = result.chars().last() {
        if !is_trailing_punctuation(last) {
            result.push(DEFAULT_TERMINATOR);
        }
    }

    result
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}
