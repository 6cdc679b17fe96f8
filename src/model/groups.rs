// File: ./src/model/groups.rs
//! Student-group extraction from the free-text note column.
//!
//! Notes are written by hand, so the same fact appears as `2. skupina`,
//! `1 a 2. skupina`, `1., 3. skupina` or `skupina 4`. Instead of several
//! overlapping patterns, the note is lowercased and tokenized once, then
//! scanned for number lists adjacent to a `skupin*` word.
//!
//! An empty result means the lesson applies to every group.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive bounds for accepted group numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRange {
    pub min: u8,
    pub max: u8,
}

impl Default for GroupRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl GroupRange {
    pub fn new(max: u8) -> Self {
        Self { min: 1, max }
    }

    pub fn contains(&self, n: u32) -> bool {
        n >= self.min as u32 && n <= self.max as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(u32),
    Word(String),
    Dot,
    Comma,
    Other,
}

fn tokenize(note: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = note.chars().flat_map(char::to_lowercase).peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            // Absurdly long digit runs overflow u32 and are not group numbers anyway.
            tokens.push(match digits.parse() {
                Ok(n) => Token::Number(n),
                Err(_) => Token::Other,
            });
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&w) = chars.peek() {
                if !w.is_alphabetic() {
                    break;
                }
                word.push(w);
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            chars.next();
            match c {
                '.' => tokens.push(Token::Dot),
                ',' | '&' | '+' => tokens.push(Token::Comma),
                c if c.is_whitespace() => {}
                _ => tokens.push(Token::Other),
            }
        }
    }
    tokens
}

fn is_group_word(token: &Token) -> bool {
    matches!(token, Token::Word(w) if w.starts_with("skupin"))
}

fn is_connector(token: &Token) -> bool {
    match token {
        Token::Comma => true,
        Token::Word(w) => w == "a" || w == "aj" || w == "and",
        _ => false,
    }
}

/// Numbers listed before a group word: `1 a 2. skupina`, `3., 4. skupina`.
/// The number directly before the word and every number after a `,`, `&`
/// or `+` must carry the ordinal dot; only a spoken `a`/`aj` may drop it.
fn collect_before(tokens: &[Token], word_idx: usize, out: &mut Vec<u32>) {
    let mut i = word_idx;
    let mut require_dot = true;

    loop {
        let has_dot = i > 0 && tokens[i - 1] == Token::Dot;
        if has_dot {
            i -= 1;
        } else if require_dot {
            return;
        }

        match i.checked_sub(1).map(|j| &tokens[j]) {
            Some(Token::Number(n)) => {
                out.push(*n);
                i -= 1;
            }
            _ => return,
        }

        if i == 0 || !is_connector(&tokens[i - 1]) {
            return;
        }
        require_dot = tokens[i - 1] == Token::Comma;
        i -= 1;
    }
}

/// Numbers listed after a group word: `skupina 2`, `skupiny 1, 2`.
fn collect_after(tokens: &[Token], word_idx: usize, out: &mut Vec<u32>) {
    let mut i = word_idx + 1;

    loop {
        match tokens.get(i) {
            Some(Token::Number(n)) => {
                out.push(*n);
                i += 1;
            }
            _ => return,
        }
        if tokens.get(i) == Some(&Token::Dot) {
            i += 1;
        }
        match tokens.get(i) {
            Some(t) if is_connector(t) => i += 1,
            _ => return,
        }
    }
}

/// Returns the deduplicated, ascending group numbers mentioned in `note`.
pub fn extract_groups(note: &str, range: GroupRange) -> Vec<u8> {
    let tokens = tokenize(note);
    let mut found = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        if is_group_word(token) {
            collect_before(&tokens, idx, &mut found);
            collect_after(&tokens, idx, &mut found);
        }
    }

    found
        .into_iter()
        .filter(|n| range.contains(*n))
        .map(|n| n as u8)
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(note: &str) -> Vec<u8> {
        extract_groups(note, GroupRange::default())
    }

    #[test]
    fn test_empty_note_means_all_groups() {
        assert!(groups("").is_empty());
        assert!(groups("prednáška pre všetkých").is_empty());
    }

    #[test]
    fn test_ordinal_before_word() {
        assert_eq!(groups("2. skupina"), vec![2]);
        assert_eq!(groups("2.skupina"), vec![2]);
        assert_eq!(groups("Len 3. Skupina"), vec![3]);
    }

    #[test]
    fn test_pair_before_word() {
        assert_eq!(groups("1 a 2. skupina"), vec![1, 2]);
        assert_eq!(groups("4., 3. skupina"), vec![3, 4]);
        assert_eq!(groups("1., 2. a 3. skupina"), vec![1, 2, 3]);
        assert_eq!(groups("1 aj 2. skupina"), vec![1, 2]);
    }

    #[test]
    fn test_word_before_number() {
        assert_eq!(groups("skupina 5"), vec![5]);
        assert_eq!(groups("SKUPINA7"), vec![7]);
        assert_eq!(groups("skupiny 1, 2"), vec![1, 2]);
    }

    #[test]
    fn test_multiple_mentions_are_merged_and_sorted() {
        assert_eq!(groups("6. skupina; 2. skupina, skupina 6"), vec![2, 6]);
    }

    #[test]
    fn test_numbers_without_group_word_are_ignored() {
        assert!(groups("miestnosť 204, 2. poschodie").is_empty());
        // No ordinal dot directly before the word.
        assert!(groups("2 skupina").is_empty());
        // Separators other than `a` keep requiring the dot.
        assert_eq!(groups("Cvičenie 5, 2. skupina"), vec![2]);
        assert_eq!(groups("týždeň 3 + 2. skupina"), vec![2]);
        assert_eq!(groups("1 & 2. skupina"), vec![2]);
    }

    #[test]
    fn test_range_bound() {
        assert!(groups("0. skupina").is_empty());
        assert!(groups("11. skupina").is_empty());
        assert!(groups("99999999999999. skupina").is_empty());
        assert_eq!(extract_groups("11. skupina", GroupRange::new(12)), vec![11]);
    }
}
