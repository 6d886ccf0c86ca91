//! Clause segmentation of trade paragraphs.
//!
//! A paragraph such as
//! `"In a 3-team trade, the Heat traded X to the Celtics; the Celtics traded Y
//! (a 2nd-round pick) to the Jazz."` is split into independently parseable
//! clauses with parentheticals, preambles and trade-exception/conditional
//! noise removed.

/// Clauses with fewer characters than this are dropped.
pub const MIN_CLAUSE_CHARS: usize = 10;

const TRADE_EXCEPTION: &str = "trade exception";
const CONDITIONAL: &str = "conditional";

/// Split a raw trade paragraph into cleaned clauses, in source order.
pub fn preprocess_trade_text(text: &str) -> Vec<String> {
    let stripped = strip_parentheticals(text);

    stripped
        .split(';')
        .filter_map(|clause| clean_clause(clause.trim()))
        .collect()
}

/// Clean one `;`-delimited clause, returning `None` if too little remains.
fn clean_clause(clause: &str) -> Option<String> {
    let clause = strip_team_count_preamble(clause);
    let mut cleaned = drop_trade_exception_sentences(clause);

    let cut = [
        find_phrase_ci(&cleaned, CONDITIONAL),
        find_phrase_ci(&cleaned, TRADE_EXCEPTION),
    ]
    .into_iter()
    .flatten()
    .min();
    if let Some(cut) = cut {
        cleaned.truncate(cut);
    }

    let cleaned = cleaned.trim().trim_end_matches('.').trim_end();
    if cleaned.chars().count() < MIN_CLAUSE_CHARS {
        return None;
    }
    Some(cleaned.to_string())
}

/// Remove parenthesized spans, including nested ones.
///
/// An unmatched `)` is kept as text. An unmatched `(` is kept together with
/// whatever follows it, minus any balanced groups inside.
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open_at: Vec<usize> = Vec::new();

    for ch in text.chars() {
        match ch {
            '(' => {
                open_at.push(out.len());
                out.push(ch);
            }
            ')' => match open_at.pop() {
                Some(start) => out.truncate(start),
                None => out.push(ch),
            },
            _ => out.push(ch),
        }
    }
    out
}

/// Strip a leading "In a 3-team trade," / "In an 11-team trade" preamble.
fn strip_team_count_preamble(clause: &str) -> &str {
    let bytes = clause.as_bytes();
    let mut i = 0;

    let expect = |word: &str, i: &mut usize| -> bool {
        let end = *i + word.len();
        if end <= bytes.len() && bytes[*i..end].eq_ignore_ascii_case(word.as_bytes()) {
            *i = end;
            true
        } else {
            false
        }
    };

    if !expect("in a", &mut i) {
        return clause;
    }
    expect("n", &mut i);
    if !expect(" ", &mut i) {
        return clause;
    }

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start || !expect("-team trade", &mut i) {
        return clause;
    }
    expect(",", &mut i);

    clause[i..].trim_start()
}

/// Drop `.`-delimited sentences that mention a trade exception.
///
/// Kept sentences are rejoined with their original separator (`.` plus a
/// space only where the source had whitespace), so the result never grows.
fn drop_trade_exception_sentences(clause: &str) -> String {
    let mut out = String::with_capacity(clause.len());

    for raw in clause.split('.') {
        let sentence = raw.trim();
        if sentence.is_empty() || find_phrase_ci(sentence, TRADE_EXCEPTION).is_some() {
            continue;
        }
        if !out.is_empty() {
            out.push('.');
            if raw.starts_with(char::is_whitespace) {
                out.push(' ');
            }
        }
        out.push_str(sentence);
    }
    out
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Byte offset of the first whole-word, ASCII case-insensitive match of `phrase`.
pub fn find_phrase_ci(haystack: &str, phrase: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = phrase.as_bytes();
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }

    (0..=hay.len() - needle.len()).find(|&i| {
        let end = i + needle.len();
        hay[i..end].eq_ignore_ascii_case(needle)
            && (i == 0 || !is_word_byte(hay[i - 1]))
            && (end == hay.len() || !is_word_byte(hay[end]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_clause() {
        let clauses = preprocess_trade_text("The Lakers traded Kendrick Nunn to the Wizards for Rui Hachimura.");
        assert_eq!(clauses, vec!["The Lakers traded Kendrick Nunn to the Wizards for Rui Hachimura"]);
    }

    #[test]
    fn test_semicolon_split_and_preamble() {
        let text = "In a 3-team trade, the Heat traded X to the Celtics; the Celtics traded Y to the Jazz; \
                    the Jazz traded cash to the Heat.";
        let clauses = preprocess_trade_text(text);
        assert_eq!(
            clauses,
            vec![
                "the Heat traded X to the Celtics",
                "the Celtics traded Y to the Jazz",
                "the Jazz traded cash to the Heat",
            ]
        );
    }

    #[test]
    fn test_preamble_variants() {
        assert_eq!(strip_team_count_preamble("In an 11-team trade, A"), "A");
        assert_eq!(strip_team_count_preamble("in a 4-team trade B"), "B");
        assert_eq!(strip_team_count_preamble("In a trade, C"), "In a trade, C");
        assert_eq!(strip_team_count_preamble("Indiana traded"), "Indiana traded");
    }

    #[test]
    fn test_parentheticals_removed() {
        let clauses = preprocess_trade_text(
            "The Pistons traded a 2025 2nd round draft pick (top-55 protected) to the Knicks for cash.",
        );
        assert_eq!(clauses, vec!["The Pistons traded a 2025 2nd round draft pick  to the Knicks for cash"]);
    }

    #[test]
    fn test_nested_parentheticals() {
        assert_eq!(strip_parentheticals("a (b (c) d) e"), "a  e");
        assert_eq!(strip_parentheticals("a ) b"), "a ) b");
        assert_eq!(strip_parentheticals("(a (b) c"), "(a  c");
    }

    #[test]
    fn test_trade_exception_sentence_dropped() {
        let text = "The Nets traded Joe Harris to the Pistons. The Nets created a trade exception.";
        assert_eq!(preprocess_trade_text(text), vec!["The Nets traded Joe Harris to the Pistons"]);
    }

    #[test]
    fn test_only_trade_exception_yields_nothing() {
        assert!(preprocess_trade_text("The Celtics used a Trade Exception.").is_empty());
    }

    #[test]
    fn test_conditional_truncates_rest_of_clause() {
        let text = "The Hawks traded Dennis Schroder to the Thunder for Dennis Schroder and a conditional 1st. More text";
        assert_eq!(
            preprocess_trade_text(text),
            vec!["The Hawks traded Dennis Schroder to the Thunder for Dennis Schroder and a"]
        );
    }

    #[test]
    fn test_conditional_is_whole_word() {
        let text = "The Hawks traded Unconditionally Smith to the Bulls";
        assert_eq!(preprocess_trade_text(text), vec![text.to_string()]);
    }

    #[test]
    fn test_short_clauses_dropped() {
        assert!(preprocess_trade_text("Lakers.; ;  ...").is_empty());
        assert_eq!(preprocess_trade_text("0123456789."), vec!["0123456789"]);
    }

    #[test]
    fn test_initials_survive() {
        let text = "The Knicks traded J.R. Smith to the Cavaliers";
        assert_eq!(preprocess_trade_text(text), vec![text.to_string()]);
    }

    #[test]
    fn test_rejoin_keeps_original_separator() {
        assert_eq!(
            drop_trade_exception_sentences("J.R. Smith left. A trade exception was made. He signed"),
            "J.R. Smith left. He signed"
        );
        assert_eq!(drop_trade_exception_sentences("A.B.trade exception.C"), "A.B.C");
    }

    #[test]
    fn test_output_properties() {
        let inputs = [
            "In a 3-team trade, A (x) traded B to C (y (z)); D traded E. F.G.H to I (conditional).",
            "a.b.c.d.e.f.g.h.i.j.k.l.m",
            "(unterminated trade text that goes on and on",
            "Lakers traded Nunn to Wizards for Hachimura.",
        ];
        for input in inputs {
            for clause in preprocess_trade_text(input) {
                assert!(clause.len() <= input.len(), "{clause:?} grew from {input:?}");
                assert!(!clause.contains(')'), "{clause:?} kept a parenthetical");
            }
        }
    }

    #[test]
    fn test_find_phrase_ci() {
        assert_eq!(find_phrase_ci("a Trade  Exception", "trade exception"), None);
        assert_eq!(find_phrase_ci("a Trade Exception.", "trade exception"), Some(2));
        assert_eq!(find_phrase_ci("preconditional", "conditional"), None);
    }
}
