//! Single-edit misspelling generator.
//!
//! For a canonical word the generator emits, in a fixed order: the word
//! itself, every adjacent transposition, every doubled character, every
//! omitted character, and every keyboard-neighbour substitution. The
//! sequence is a pure function of the word, so registration and any later
//! replay see exactly the same keys.

use thiserror::Error;

/// Keyboard neighbours for `a..=z` followed by `ç`.
const NEIGHBORS: [&str; 27] = [
    "qwszx",    // a
    "ghvn",     // b
    "dfxv",     // c
    "wersfxcv", // d
    "wrsdf",    // e
    "ertdgcvb", // f
    "rtyfhvbn", // g
    "tyugjbnm", // h
    "uojkl",    // i
    "yuihknm",  // j
    "uiojlm",   // k
    "iopkç",    // l
    "jkn",      // m
    "hjbm",     // n
    "ipklç",    // o
    "olç",      // p
    "wsa",      // q
    "etdfg",    // r
    "qweadzxc", // s
    "ryfgh",    // t
    "yihjk",    // u
    "fgcb",     // v
    "qeasd",    // w
    "asdzc",    // x
    "tughj",    // y
    "asx",      // z
    "opl",      // ç
];

/// Keyboard neighbours of `ch`, or `None` outside the supported alphabet.
pub fn neighbors(ch: char) -> Option<&'static str> {
    match ch {
        'a'..='z' => Some(NEIGHBORS[ch as usize - 'a' as usize]),
        'ç' => Some(NEIGHBORS[26]),
        _ => None,
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum VariantError {
    #[error("cannot generate variants of an empty word")]
    EmptyWord,
    #[error("unsupported character {ch:?} at position {position}")]
    UnsupportedChar { ch: char, position: usize },
}

/// Which edit produced a variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edit {
    Identity,
    Transposition,
    Duplication,
    Omission,
    Substitution,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variant {
    pub key: String,
    pub edit: Edit,
}

/// Check that every character of `word` has a neighbour list.
pub fn validate(word: &str) -> Result<Vec<char>, VariantError> {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return Err(VariantError::EmptyWord);
    }
    if let Some((position, &ch)) = chars
        .iter()
        .enumerate()
        .find(|(_, c)| neighbors(**c).is_none())
    {
        return Err(VariantError::UnsupportedChar { ch, position });
    }
    Ok(chars)
}

/// Exact number of variants `variants(word)` would emit.
pub fn count(word: &str) -> Result<usize, VariantError> {
    let chars = validate(word)?;
    let l = chars.len();
    let subs: usize = chars
        .iter()
        .filter_map(|&c| neighbors(c))
        .map(|n| n.chars().count())
        .sum();
    Ok(1 + (l - 1) + l + l + subs)
}

/// All single-edit variants of `word`, in generation order. Duplicates are
/// kept (e.g. transposing two equal letters yields the word again), and a
/// one-letter word yields the empty string as its omission.
pub fn variants(word: &str) -> Result<Vec<Variant>, VariantError> {
    let mut buf = validate(word)?;
    let l = buf.len();
    let mut out = Vec::with_capacity(count(word)?);
    let mut emit = |buf: &[char], edit: Edit| {
        out.push(Variant {
            key: buf.iter().collect(),
            edit,
        })
    };

    emit(&buf[..], Edit::Identity);

    for i in 0..l - 1 {
        buf.swap(i, i + 1);
        emit(&buf[..], Edit::Transposition);
        buf.swap(i, i + 1);
    }

    for i in 0..l {
        let c = buf[i];
        buf.insert(i, c);
        emit(&buf[..], Edit::Duplication);
        buf.remove(i);
    }

    for i in 0..l {
        let c = buf.remove(i);
        emit(&buf[..], Edit::Omission);
        buf.insert(i, c);
    }

    for i in 0..l {
        let original = buf[i];
        for n in neighbors(original).unwrap_or_default().chars() {
            buf[i] = n;
            emit(&buf[..], Edit::Substitution);
        }
        buf[i] = original;
    }

    Ok(out)
}
