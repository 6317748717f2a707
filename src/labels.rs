//! Punctuation label table emitted by the sequence-labeling model.

/// Punctuation types, indexed by the label id the model predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctLabel {
    None = 0,
    Period = 1,
    Comma = 2,
    Question = 3,
    Exclamation = 4,
    Colon = 5,
    Semicolon = 6,
    Dash = 7,
}

impl PunctLabel {
    /// All labels in id order.
    pub const ALL: [PunctLabel; 8] = [
        PunctLabel::None,
        PunctLabel::Period,
        PunctLabel::Comma,
        PunctLabel::Question,
        PunctLabel::Exclamation,
        PunctLabel::Colon,
        PunctLabel::Semicolon,
        PunctLabel::Dash,
    ];

    /// Map a raw label id to a label. Ids outside the table yield `None`.
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn id(self) -> usize {
        self as usize
    }

    /// The glyph appended after a word, or `None` for the "no punctuation" label.
    pub fn as_char(self) -> Option<char> {
        match self {
            PunctLabel::None => None,
            PunctLabel::Period => Some('.'),
            PunctLabel::Comma => Some(','),
            PunctLabel::Question => Some('?'),
            PunctLabel::Exclamation => Some('!'),
            PunctLabel::Colon => Some(':'),
            PunctLabel::Semicolon => Some(';'),
            PunctLabel::Dash => Some('-'),
        }
    }

    /// Whether the next word starts a new sentence.
    pub fn is_sentence_end(self) -> bool {
        matches!(
            self,
            PunctLabel::Period | PunctLabel::Question | PunctLabel::Exclamation
        )
    }
}

/// Glyphs that count as trailing punctuation when deciding whether to append
/// the default terminator.
pub(crate) fn is_trailing_punctuation(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | ',' | ';' | ':' | '-')
}
