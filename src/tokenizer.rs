//! Character-level tokenizer for the punctuation model.
//!
//! Every character of the input maps to exactly one id. Words are separated
//! by the id of the space character, and the sequence is framed by BOS/EOS and
//! padded with PAD up to a fixed length.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Unknown character fallback.
pub const UNK_ID: i64 = 0;
/// Beginning of sequence (`<s>`).
pub const BOS_ID: i64 = 1;
/// End of sequence (`</s>`).
pub const EOS_ID: i64 = 2;
/// Padding (`<pad>`).
pub const PAD_ID: i64 = 3;

/// Default sequence length used by [`CharTokenizer::encode_default`].
pub const DEFAULT_MAX_LENGTH: usize = 256;

/// BOS + one content slot + EOS.
pub const MIN_MAX_LENGTH: usize = 3;

/// Ids below this value are reserved.
const CHAR_OFFSET: i64 = 10;

const RESERVED_IDS: [i64; 4] = [UNK_ID, BOS_ID, EOS_ID, PAD_ID];

const ALPHABET: &[&str] = &[
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    ".,;:!?¿¡-()[]{}\"'",
    "áéíóúüñÁÉÍÓÚÜÑ",
    " ",
];

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(Vocabulary::build);

/// Bijective mapping between the fixed alphabet and token ids.
#[derive(Debug)]
pub struct Vocabulary {
    char_to_id: HashMap<char, i64>,
    id_to_char: HashMap<i64, char>,
}

impl Vocabulary {
    fn build() -> Self {
        let mut char_to_id = HashMap::new();
        let mut id_to_char = HashMap::new();

        for (index, c) in ALPHABET.iter().flat_map(|group| group.chars()).enumerate() {
            let id = CHAR_OFFSET + index as i64;
            char_to_id.insert(c, id);
            id_to_char.insert(id, c);
        }

        log::debug!("Built character vocabulary with {} entries", char_to_id.len());

        Self {
            char_to_id,
            id_to_char,
        }
    }

    /// The process-wide vocabulary, built on first use.
    pub fn global() -> &'static Vocabulary {
        &VOCABULARY
    }

    /// Id for `c`, or [`UNK_ID`] if the character is outside the alphabet.
    pub fn id_of(&self, c: char) -> i64 {
        self.char_to_id.get(&c).copied().unwrap_or(UNK_ID)
    }

    pub fn char_of(&self, id: i64) -> Option<char> {
        self.id_to_char.get(&id).copied()
    }

    /// Number of characters in the alphabet (reserved ids excluded).
    pub fn len(&self) -> usize {
        self.char_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.char_to_id.is_empty()
    }

    pub fn is_reserved(id: i64) -> bool {
        RESERVED_IDS.contains(&id)
    }
}

/// Output of [`CharTokenizer::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedResult {
    /// Token ids, always exactly `max_length` long.
    pub input_ids: Vec<i64>,
    /// 1 for BOS, EOS and content slots, 0 for padding.
    pub attention_mask: Vec<i64>,
    /// Whitespace-separated words of the lowercased input. Not truncated:
    /// trailing words may have no slots in `input_ids`.
    pub original_words: Vec<String>,
}

impl TokenizedResult {
    /// Number of non-padding slots.
    pub fn len_unpadded(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

/// Stateless character tokenizer over the global [`Vocabulary`].
#[derive(Debug, Clone, Copy)]
pub struct CharTokenizer {
    vocab: &'static Vocabulary,
}

impl CharTokenizer {
    pub fn new() -> Self {
        Self {
            vocab: Vocabulary::global(),
        }
    }

    pub fn vocabulary(&self) -> &'static Vocabulary {
        self.vocab
    }

    /// Encode with [`DEFAULT_MAX_LENGTH`].
    pub fn encode_default(&self, text: &str) -> TokenizedResult {
        self.encode(text, DEFAULT_MAX_LENGTH)
    }

    /// Encode `text` into a fixed-length id sequence.
    ///
    /// The text is lowercased before splitting; capitalization is restored
    /// later from the predicted labels. Content stops once `max_length - 1`
    /// slots are used so that EOS always fits. `max_length` below
    /// [`MIN_MAX_LENGTH`] is raised to it.
    pub fn encode(&self, text: &str, max_length: usize) -> TokenizedResult {
        let max_length = max_length.max(MIN_MAX_LENGTH);
        let content_limit = max_length - 1;

        let lowered = text.to_lowercase();
        let original_words: Vec<String> =
            lowered.split_whitespace().map(str::to_string).collect();

        let mut input_ids = Vec::with_capacity(max_length);
        input_ids.push(BOS_ID);

        let space_id = self.vocab.id_of(' ');
        'words: for (word_idx, word) in original_words.iter().enumerate() {
            if input_ids.len() >= content_limit {
                break;
            }
            if word_idx > 0 {
                input_ids.push(space_id);
            }
            for c in word.chars() {
                if input_ids.len() >= content_limit {
                    break 'words;
                }
                input_ids.push(self.vocab.id_of(c));
            }
        }

        input_ids.push(EOS_ID);

        let mut attention_mask = vec![1; input_ids.len()];
        input_ids.resize(max_length, PAD_ID);
        attention_mask.resize(max_length, 0);

        log::trace!(
            "Encoded {} words into {} of {} slots",
            original_words.len(),
            attention_mask.iter().filter(|&&m| m != 0).count(),
            max_length
        );

        TokenizedResult {
            input_ids,
            attention_mask,
            original_words,
        }
    }

    /// Decode ids back to text, dropping reserved and unknown ids.
    pub fn decode(&self, ids: &[i64]) -> String {
        let text: String = ids
            .iter()
            .filter(|&&id| !Vocabulary::is_reserved(id))
            .filter_map(|&id| self.vocab.char_of(id))
            .collect();
        text.trim().to_string()
    }
}

impl Default for CharTokenizer {
    fn default() -> Self {
        Self::new()
    }
}
