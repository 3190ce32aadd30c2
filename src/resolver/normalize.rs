//! Name normalization and transliteration.
//!
//! Produces the canonical spelling a name is compared and merged under:
//! lowercased, stripped of punctuation outside the name alphabet, and
//! transliterated into a single script so that `"Иванов И.И."` and
//! `"ivanov i.i."` collapse to the same string.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::models::AuthorName;

/// Which script names are transliterated into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Transliterate Cyrillic names into Latin
    #[default]
    #[value(name = "cyrillic-to-latin")]
    CyrillicToLatin,

    /// Transliterate Latin names into Cyrillic
    #[value(name = "latin-to-cyrillic")]
    LatinToCyrillic,
}

// Lowercase Cyrillic to Latin, GOST-style. Characters without an entry
// (digraph-free direction) pass through unchanged.
const CYR_TO_LAT: &[(char, &str)] = &[
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "i"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "kh"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "shch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
];

// Latin to Cyrillic, longest sequences first so digraphs win over their
// single-letter prefixes.
const LAT_TO_CYR: &[(&str, &str)] = &[
    ("shch", "щ"),
    ("zh", "ж"),
    ("kh", "х"),
    ("ts", "ц"),
    ("ch", "ч"),
    ("sh", "ш"),
    ("yu", "ю"),
    ("ya", "я"),
    ("a", "а"),
    ("b", "б"),
    ("v", "в"),
    ("g", "г"),
    ("d", "д"),
    ("e", "е"),
    ("z", "з"),
    ("i", "и"),
    ("k", "к"),
    ("l", "л"),
    ("m", "м"),
    ("n", "н"),
    ("o", "о"),
    ("p", "п"),
    ("r", "р"),
    ("s", "с"),
    ("t", "т"),
    ("u", "у"),
    ("f", "ф"),
    ("y", "ы"),
];

/// Normalize a raw author-name spelling into its canonical form.
///
/// Steps, in order:
/// 1. Unicode NFC + lowercase.
/// 2. Drop every character outside Cyrillic letters, Latin letters, space
///    and period.
/// 3. Strip a single trailing period (abbreviation marker).
/// 4. Keep the first token as the surname and concatenate all remaining
///    tokens with no separator, so multi-part initials like `"и. и."`
///    become the single block `"и.и"` and compare as one string.
/// 5. Transliterate into the target script. Characters with no mapping pass
///    through unchanged; normalization never fails.
pub fn normalize(raw: &str, direction: Direction) -> AuthorName {
    let cleaned: String = raw
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|&c| is_name_char(c))
        .collect();

    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(cleaned);

    let mut tokens = cleaned.split_whitespace();
    let joined = match tokens.next() {
        Some(surname) => {
            let rest: String = tokens.collect();
            if rest.is_empty() {
                surname.to_string()
            } else {
                format!("{} {}", surname, rest)
            }
        }
        None => String::new(),
    };

    let normalized = transliterate(&joined, direction);
    let (surname, initials) = match normalized.split_once(' ') {
        Some((s, i)) => (s.to_string(), i.to_string()),
        None => (normalized.clone(), String::new()),
    };

    AuthorName {
        raw: raw.to_string(),
        normalized,
        surname,
        initials,
    }
}

/// Transliterate a cleaned, lowercased string into the target script.
///
/// Best effort: anything without a mapping is copied through as-is.
pub fn transliterate(text: &str, direction: Direction) -> String {
    match direction {
        Direction::CyrillicToLatin => cyrillic_to_latin(text),
        Direction::LatinToCyrillic => latin_to_cyrillic(text),
    }
}

fn is_name_char(c: char) -> bool {
    c == ' ' || c == '.' || c.is_ascii_alphabetic() || is_cyrillic(c)
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё' | 'А'..='Я' | 'Ё')
}

fn cyrillic_to_latin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match CYR_TO_LAT.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

fn latin_to_cyrillic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while !rest.is_empty() {
        for (from, to) in LAT_TO_CYR {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        // Unmappable leading character passes through unchanged
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}
