//! HTML escaping for user-supplied text

/// Escape text so it can be inserted into markup as a text node.
///
/// Covers the characters a browser would escape when serializing a
/// text node, plus both quote styles so the result is also safe inside
/// attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
