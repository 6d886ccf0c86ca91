//! Paragraph extraction from per-year HTML archives.
//!
//! The archive is a saved transactions page; every `<p>` element is one
//! candidate announcement. Tags are stripped, entities decoded and whitespace
//! collapsed so the text reads like the rendered page.

/// Extract the text of every non-empty `<p>` element, in document order.
pub fn extract_paragraphs(html: &str) -> Vec<String> {
    let html = strip_comments(html);
    // ASCII lowering keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut paragraphs = Vec::new();
    let mut from = 0;

    while let Some(start) = find_p_open(&lower, from) {
        let open_end = match lower[start..].find('>') {
            Some(i) => start + i + 1,
            None => break,
        };

        // An unclosed <p> runs until the next <p> or the end of the document.
        let close = find_p_close(&lower, open_end);
        let next_open = find_p_open(&lower, open_end);
        let end = match (close, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => lower.len(),
        };

        let text = normalize_ws(&decode_entities(&strip_tags(&html[open_end..end])));
        if !text.is_empty() {
            paragraphs.push(text);
        }
        from = end;
    }

    paragraphs
}

/// Only paragraphs that mention a trade are worth an extraction call.
pub fn is_trade_paragraph(text: &str) -> bool {
    text.to_ascii_lowercase().contains("traded")
}

/// Position of the next `<p>` / `<p ...>` opening tag at or after `from`.
fn find_p_open(lower: &str, from: usize) -> Option<usize> {
    let bytes = lower.as_bytes();
    let mut at = from;
    while let Some(rel) = lower.get(at..)?.find("<p") {
        let pos = at + rel;
        match bytes.get(pos + 2) {
            Some(b'>') | Some(b'/') => return Some(pos),
            Some(b) if b.is_ascii_whitespace() => return Some(pos),
            _ => at = pos + 2,
        }
    }
    None
}

/// Position of the next `</p>` closing tag, ignoring `</pre>` and the like.
fn find_p_close(lower: &str, from: usize) -> Option<usize> {
    let bytes = lower.as_bytes();
    let mut at = from;
    while let Some(rel) = lower.get(at..)?.find("</p") {
        let pos = at + rel;
        match bytes.get(pos + 3) {
            Some(b'>') => return Some(pos),
            Some(b) if b.is_ascii_whitespace() => return Some(pos),
            _ => at = pos + 3,
        }
    }
    None
}

fn strip_comments(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove markup, keeping text content.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode the named entities that show up on transaction pages plus numeric ones.
/// Unknown entities are left as-is.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let ch = match name {
        "amp" => '&',
        "nbsp" => ' ',
        "quot" => '"',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        _ => return None,
    };
    Some(ch)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
