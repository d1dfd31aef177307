//! Just enough CSS to find and rewrite declarations.
//!
//! Two entry points: [`rewrite_declarations`] for a `style` attribute (a flat
//! declaration list) and [`rewrite_stylesheet`] for the text of a `<style>`
//! element, where only the declaration lists inside `{ ... }` blocks are
//! touched. Selectors, at-rule preludes, comments and strings pass through
//! unchanged. A `;` inside parentheses or quotes does not end a declaration.

/// A single `property: value` declaration, borrowed from its source chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    /// Whitespace and comments before the property name
    pub leading: &'a str,
    /// Property name as written
    pub property: &'a str,
    /// Trimmed value without the priority
    pub value: &'a str,
    /// `!important` including the whitespace before it, or empty
    pub priority: &'a str,
    /// Whitespace between the value and the terminator
    pub trailing: &'a str,
    /// `;` or empty for an unterminated last declaration
    pub terminator: &'a str,
}

impl Declaration<'_> {
    /// Render the declaration with a new value, normalized to `prop: value`.
    pub fn with_value(&self, value: &str) -> String {
        format!(
            "{}{}: {}{}{}{}",
            self.leading, self.property, value, self.priority, self.trailing, self.terminator
        )
    }

    pub fn is(&self, property: &str) -> bool {
        self.property.eq_ignore_ascii_case(property)
    }
}

/// Split a declaration list into chunks, each ending after its `;`.
///
/// Concatenating the chunks gives back the input.
pub fn split_declarations(list: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;

    for (i, b) in Tokens::new(list) {
        if b == b';' {
            chunks.push(&list[start..=i]);
            start = i + 1;
        }
    }
    if start < list.len() {
        chunks.push(&list[start..]);
    }

    chunks
}

/// Parse one chunk produced by [`split_declarations`].
pub fn parse_declaration(chunk: &str) -> Option<Declaration<'_>> {
    let (body, terminator) = match chunk.strip_suffix(';') {
        Some(body) => (body, &chunk[body.len()..]),
        None => (chunk, ""),
    };

    let (colon, _) = Tokens::new(body).find(|&(_, b)| b == b':')?;
    let before = &body[..colon];
    let after = &body[colon + 1..];

    let name_start = skip_trivia(before);
    let property = before[name_start..].trim_end();
    if property.is_empty() || property.contains(char::is_whitespace) {
        return None;
    }

    let full_value = after.trim();
    let trailing = &after[after.trim_end().len()..];
    let (value, priority) = split_priority(full_value);
    if value.is_empty() {
        return None;
    }

    Some(Declaration {
        leading: &before[..name_start],
        property,
        value,
        priority,
        trailing,
        terminator,
    })
}

/// Rewrite the declarations of a declaration list.
///
/// `f` returns the replacement value for a declaration, or `None` to keep it
/// byte-identical. Returns the new text and the number of rewrites.
pub fn rewrite_declarations(
    list: &str,
    mut f: impl FnMut(&Declaration<'_>) -> Option<String>,
) -> (String, usize) {
    let mut out = String::with_capacity(list.len());
    let count = push_rewritten(&mut out, list, &mut f);
    (out, count)
}

/// Rewrite the declarations inside every `{ ... }` block of a stylesheet.
pub fn rewrite_stylesheet(
    sheet: &str,
    mut f: impl FnMut(&Declaration<'_>) -> Option<String>,
) -> (String, usize) {
    let mut out = String::with_capacity(sheet.len());
    let mut count = 0;
    let mut depth = 0usize;
    let mut pending = 0;

    for (i, b) in Tokens::new(sheet) {
        match b {
            b'{' => {
                out.push_str(&sheet[pending..=i]);
                depth += 1;
                pending = i + 1;
            }
            b'}' if depth > 0 => {
                count += push_rewritten(&mut out, &sheet[pending..i], &mut f);
                out.push('}');
                depth -= 1;
                pending = i + 1;
            }
            b';' if depth > 0 => {
                count += push_rewritten(&mut out, &sheet[pending..=i], &mut f);
                pending = i + 1;
            }
            _ => {}
        }
    }

    // An unclosed block still holds declarations
    if depth > 0 {
        count += push_rewritten(&mut out, &sheet[pending..], &mut f);
    } else {
        out.push_str(&sheet[pending..]);
    }

    (out, count)
}

fn push_rewritten(
    out: &mut String,
    list: &str,
    f: &mut impl FnMut(&Declaration<'_>) -> Option<String>,
) -> usize {
    let mut count = 0;
    for chunk in split_declarations(list) {
        let rewritten = parse_declaration(chunk).and_then(|decl| f(&decl).map(|v| decl.with_value(&v)));
        match rewritten {
            Some(text) => {
                out.push_str(&text);
                count += 1;
            }
            None => out.push_str(chunk),
        }
    }
    count
}

fn split_priority(value: &str) -> (&str, &str) {
    if let Some(bang) = value.rfind('!') {
        let head = value[..bang].trim_end();
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (head, &value[head.len()..]);
        }
    }
    (value, "")
}

/// Byte offset of the first character that is not whitespace or a comment.
fn skip_trivia(s: &str) -> usize {
    let mut rest = s;
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix("/*") {
            Some(comment) => match comment.find("*/") {
                Some(end) => rest = &comment[end + 2..],
                None => return s.len(),
            },
            None => return s.len() - trimmed.len(),
        }
    }
}

/// Structural bytes of CSS text: everything outside comments, strings and
/// parentheses, with their offsets.
struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
    parens: usize,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
            parens: 0,
        }
    }

    fn skip_comment(&mut self) {
        let body = self.pos + 2;
        self.pos = self.bytes[body.min(self.bytes.len())..]
            .windows(2)
            .position(|w| w == b"*/")
            .map_or(self.bytes.len(), |p| body + p + 2);
    }

    /// Skip a quoted string. A quote that is never closed is skipped on its
    /// own, so the text after it stays structural.
    fn skip_string(&mut self, quote: u8) {
        let mut pos = self.pos + 1;
        while let Some(&b) = self.bytes.get(pos) {
            pos += if b == b'\\' { 2 } else { 1 };
            if b == quote {
                self.pos = pos;
                return;
            }
        }
        self.pos += 1;
    }
}

impl Iterator for Tokens<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.skip_comment();
                    continue;
                }
                b'"' | b'\'' => {
                    self.skip_string(b);
                    continue;
                }
                // An unbalanced `(` ends with its block
                b'}' if self.parens > 0 => {
                    self.parens = 0;
                    continue;
                }
                b'(' => self.parens += 1,
                b')' => self.parens = self.parens.saturating_sub(1),
                _ if self.parens == 0 => {
                    let at = self.pos;
                    self.pos += 1;
                    return Some((at, b));
                }
                _ => {}
            }
            self.pos += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_fill(decl: &Declaration<'_>) -> Option<String> {
        decl.is("fill").then(|| decl.value.to_uppercase())
    }

    #[test]
    fn test_split_declarations() {
        let list = "fill: red; stroke:url(data:a;b) ;opacity:1";
        let chunks = split_declarations(list);
        assert_eq!(chunks, ["fill: red;", " stroke:url(data:a;b) ;", "opacity:1"]);
        assert_eq!(chunks.concat(), list);
    }

    #[test]
    fn test_split_respects_strings_and_comments() {
        let chunks = split_declarations(r#"content: "a;b"; /* x; */ fill: red"#);
        assert_eq!(chunks, [r#"content: "a;b";"#, " /* x; */ fill: red"]);
    }

    #[test]
    fn test_parse_declaration_parts() {
        let decl = parse_declaration("  fill :  #fff !important ;").unwrap();
        assert_eq!(decl.leading, "  ");
        assert_eq!(decl.property, "fill");
        assert_eq!(decl.value, "#fff");
        assert_eq!(decl.priority, " !important");
        assert_eq!(decl.trailing, " ");
        assert_eq!(decl.terminator, ";");
    }

    #[test]
    fn test_parse_declaration_after_comment() {
        let decl = parse_declaration("/* brand */ stroke:blue").unwrap();
        assert_eq!(decl.leading, "/* brand */ ");
        assert_eq!(decl.property, "stroke");
        assert_eq!(decl.terminator, "");
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert_eq!(parse_declaration("   "), None);
        assert_eq!(parse_declaration("fill"), None);
        assert_eq!(parse_declaration(": red;"), None);
        assert_eq!(parse_declaration("fill: ;"), None);
        assert_eq!(parse_declaration("a b: red;"), None);
    }

    #[test]
    fn test_rewrite_declarations() {
        let (out, n) = rewrite_declarations("fill:red;stroke:blue;FILL: green", upper_fill);
        assert_eq!(out, "fill: RED;stroke:blue;FILL: GREEN");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_rewrite_keeps_untouched_bytes() {
        let list = " stroke :  blue ;  opacity:.5";
        let (out, n) = rewrite_declarations(list, upper_fill);
        assert_eq!(out, list);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_rewrite_stylesheet() {
        let sheet = ".a{fill:red;} .b:hover { opacity: 1; fill: blue }";
        let (out, n) = rewrite_stylesheet(sheet, upper_fill);
        assert_eq!(out, ".a{fill: RED;} .b:hover { opacity: 1; fill: BLUE }");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_rewrite_stylesheet_nested_and_at_rules() {
        let sheet = "@import url(x.css); @media (min-width: 1px) { .a { fill: red } }";
        let (out, n) = rewrite_stylesheet(sheet, upper_fill);
        assert_eq!(
            out,
            "@import url(x.css); @media (min-width: 1px) { .a { fill: RED } }"
        );
        assert_eq!(n, 1);
    }

    #[test]
    fn test_rewrite_stylesheet_ignores_comments() {
        let sheet = "/* .a { fill: red } */ .b { fill: red; }";
        let (out, _) = rewrite_stylesheet(sheet, upper_fill);
        assert_eq!(out, "/* .a { fill: red } */ .b { fill: RED; }");
    }

    #[test]
    fn test_unterminated_string_stays_in_its_block() {
        let red = |decl: &Declaration<'_>| (decl.value == "red").then(|| "RED".to_string());

        let (out, n) = rewrite_stylesheet(".a{fill:'x;} .b{fill:red;}", red);
        assert_eq!(out, ".a{fill:'x;} .b{fill: RED;}");
        assert_eq!(n, 1);

        let (out, n) = rewrite_stylesheet(".a{fill:red(;} .b{fill:red;}", red);
        assert_eq!(out, ".a{fill:red(;} .b{fill: RED;}");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_rewrite_stylesheet_unclosed_block() {
        let (out, n) = rewrite_stylesheet(".a { fill: red", upper_fill);
        assert_eq!(out, ".a { fill: RED");
        assert_eq!(n, 1);
    }
}
