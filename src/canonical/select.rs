//! Multi-pattern glob selection over registry paths.
//!
//! Patterns are evaluated in order, starting from an empty selection:
//! a plain pattern adds the paths it matches, a `!pattern` removes them.
//!
//! Matching is per `/`-separated segment. Each segment compiles to an
//! anchored regex; `**` spans zero or more whole segments. Paths are taken
//! exactly as stored, so a backslash is an ordinary character.
//!
//! | Syntax         | Meaning                                  |
//! |----------------|------------------------------------------|
//! | `*` / `?`      | any run / one char inside a segment      |
//! | `[abc]` `[!a]` | character class, negated class           |
//! | `**`           | zero or more segments                    |
//! | `{a,b}` `{1..3}` | brace alternatives, numeric range      |
//! | `@(a\|b)` `?(..)` `+(..)` `*(..)` | extglob groups        |
//! | `!(a\|b)`      | anything but the alternatives            |
//!
//! Wildcards never match a leading `.` unless the pattern segment itself
//! starts with one.
//!
//! A segment holding `!(..)` is split into pieces around each negated group
//! and matched by trying every split of the path segment, since `regex` has
//! no lookahead. Brace expansion stops at [`MAX_BRACE_EXPANSIONS`] globs per
//! pattern; a pattern that would exceed it is matched literally.

use regex::Regex;

/// Upper bound on the globs one pattern may expand to.
pub const MAX_BRACE_EXPANSIONS: usize = 1024;

/// Compiled pattern list.
#[derive(Debug, Clone)]
pub struct Selector {
    globs: Vec<Glob>,
}

impl Selector {
    /// Compile `patterns`. Malformed constructs are matched literally.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let globs = patterns
            .iter()
            .flat_map(|pattern| Glob::compile_all(pattern.as_ref()))
            .collect();
        Self { globs }
    }

    /// Whether `path` survives the whole pattern list.
    pub fn is_match(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('/').collect();
        self.globs.iter().fold(false, |selected, glob| {
            if glob.negated {
                selected && !glob.matches(&segments)
            } else {
                selected || glob.matches(&segments)
            }
        })
    }

    /// Matching paths, in input order.
    pub fn select<'a, I>(&self, paths: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths.into_iter().filter(|path| self.is_match(path)).collect()
    }
}

// ============================================================================
// Glob
// ============================================================================

#[derive(Debug, Clone)]
struct Glob {
    segments: Vec<Segment>,
    negated: bool,
}

#[derive(Debug, Clone)]
enum Segment {
    Globstar,
    Pattern {
        regex: Regex,
        /// Pattern segment starts with a literal `.`, so dot entries may match.
        allows_dot: bool,
    },
    /// Segment containing `!(..)`, matched piece by piece.
    Pieces { pieces: Vec<Piece>, allows_dot: bool },
}

#[derive(Debug, Clone)]
struct Piece {
    regex: Regex,
    negated: bool,
}

impl Piece {
    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.negated
    }
}

impl Glob {
    /// Compile one pattern string; brace expansion may yield several globs.
    fn compile_all(pattern: &str) -> Vec<Self> {
        if pattern.is_empty() {
            return Vec::new();
        }

        let bangs = pattern.chars().take_while(|&c| c == '!').count();
        // `!(` opens an extglob group rather than negating
        let bangs = if pattern[bangs..].starts_with('(') {
            bangs.saturating_sub(1)
        } else {
            bangs
        };
        let negated = bangs % 2 == 1;
        let body = &pattern[bangs..];

        expand_braces(body)
            .unwrap_or_else(|| vec![body.to_string()])
            .iter()
            .filter_map(|expanded| Self::compile(expanded, negated))
            .collect()
    }

    fn compile(pattern: &str, negated: bool) -> Option<Self> {
        let segments = pattern
            .split('/')
            .map(Segment::compile)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { segments, negated })
    }

    fn matches(&self, path: &[&str]) -> bool {
        match_segments(&self.segments, path)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Globstar, rest)) => {
            for skip in 0..=path.len() {
                if match_segments(rest, &path[skip..]) {
                    return true;
                }
                if path.get(skip).is_none_or(|seg| seg.starts_with('.')) {
                    return false;
                }
            }
            false
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

impl Segment {
    fn compile(segment: &str) -> Option<Self> {
        if segment == "**" {
            return Some(Self::Globstar);
        }
        let allows_dot = segment.starts_with('.');
        let sources = split_negations(segment);

        // `translate` escapes everything it does not understand, so compiling
        // only fails on pathological sizes.
        if let [(source, false)] = sources.as_slice() {
            let regex = anchored(source)?;
            return Some(Self::Pattern { regex, allows_dot });
        }

        let pieces = sources
            .into_iter()
            .map(|(source, negated)| Some(Piece { regex: anchored(&source)?, negated }))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::Pieces { pieces, allows_dot })
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Globstar => true,
            Self::Pattern { regex, allows_dot } => {
                (*allows_dot || !segment.starts_with('.')) && regex.is_match(segment)
            }
            Self::Pieces { pieces, allows_dot } => {
                (*allows_dot || !segment.starts_with('.')) && match_pieces(pieces, segment)
            }
        }
    }
}

fn anchored(source: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{source})$")).ok()
}

/// Try every split of `text` so each piece covers one consecutive part.
fn match_pieces(pieces: &[Piece], text: &str) -> bool {
    match pieces.split_first() {
        None => text.is_empty(),
        Some((piece, [])) => piece.matches(text),
        Some((piece, rest)) => text
            .char_indices()
            .map(|(at, _)| at)
            .chain(std::iter::once(text.len()))
            .any(|at| piece.matches(&text[..at]) && match_pieces(rest, &text[at..])),
    }
}

// ============================================================================
// Translation
// ============================================================================

/// Split a segment around its top-level `!(..)` groups.
///
/// Returns regex sources paired with whether the piece is negated. A segment
/// without a negated group comes back as a single plain piece.
fn split_negations(glob: &str) -> Vec<(String, bool)> {
    let chars: Vec<char> = glob.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            '\\' => {
                i += 2;
                continue;
            }
            '[' => {
                if let Some((_, end)) = translate_class(&chars, i) {
                    i = end + 1;
                    continue;
                }
            }
            '@' | '?' | '+' | '*' | '!' if next == Some('(') => {
                if let Some((group, end)) = translate_extglob(&chars, i + 2) {
                    if c == '!' {
                        let plain: String = chars[start..i].iter().collect();
                        pieces.push((translate(&plain), false));
                        pieces.push((group, true));
                        start = end + 1;
                    }
                    i = end + 1;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    let plain: String = chars[start..].iter().collect();
    pieces.push((translate(&plain), false));
    pieces
}

/// Translate one glob segment into regex source.
fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if matches!(c, '@' | '?' | '+' | '*') && next == Some('(') {
            if let Some((group, end)) = translate_extglob(&chars, i + 2) {
                out.push_str(&group);
                out.push_str(match c {
                    '?' => "?",
                    '+' => "+",
                    '*' => "*",
                    _ => "",
                });
                i = end + 1;
                continue;
            }
        }

        match c {
            '*' => {
                // collapse runs, `a**b` behaves like `a*b` inside a segment
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match translate_class(&chars, i) {
                Some((class, end)) => {
                    out.push_str(&class);
                    i = end;
                }
                None => out.push_str(r"\["),
            },
            '\\' if next.is_some() => {
                i += 1;
                out.push_str(&regex::escape(&chars[i].to_string()));
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out
}

/// Translate `[...]` starting at `start`; returns the class and closing index.
fn translate_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    let mut class = String::from("[");

    if matches!(chars.get(i), Some('!' | '^')) {
        class.push('^');
        i += 1;
    }
    // a leading `]` is literal
    if chars.get(i) == Some(&']') {
        class.push_str(r"\]");
        i += 1;
    }

    while let Some(&c) = chars.get(i) {
        match c {
            ']' => {
                class.push(']');
                return Some((class, i));
            }
            '\\' | '[' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            _ => class.push(c),
        }
        i += 1;
    }
    None
}

/// Translate an extglob body starting just after `(`; returns the
/// non-capturing group and the index of the closing `)`.
fn translate_extglob(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut depth = 0usize;
    let mut alternatives = Vec::new();
    let mut current = String::new();

    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                alternatives.push(current);
                let group = alternatives
                    .iter()
                    .map(|alt| translate(alt))
                    .collect::<Vec<_>>()
                    .join("|");
                return Some((format!("(?:{group})"), start + offset));
            }
            ')' => depth -= 1,
            '|' if depth == 0 => {
                alternatives.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    None
}

// ============================================================================
// Brace expansion
// ============================================================================

/// Expand `{a,b}` alternatives and `{1..3}` ranges, left to right.
///
/// Braces without a top-level comma or a valid range stay literal. Returns
/// `None` once the expansion would exceed [`MAX_BRACE_EXPANSIONS`].
fn expand_braces(pattern: &str) -> Option<Vec<String>> {
    let mut expanded = Vec::new();
    expand_into(pattern, &mut expanded).then_some(expanded)
}

fn expand_into(pattern: &str, expanded: &mut Vec<String>) -> bool {
    let Some((open, close, alternatives)) = find_brace_set(pattern) else {
        if expanded.len() >= MAX_BRACE_EXPANSIONS {
            return false;
        }
        expanded.push(pattern.to_string());
        return true;
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    alternatives
        .iter()
        .all(|alt| expand_into(&format!("{prefix}{alt}{suffix}"), expanded))
}

/// Locate the first expandable brace set: `(open, close, alternatives)`.
fn find_brace_set(pattern: &str) -> Option<(usize, usize, Vec<String>)> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(rel) = pattern[search_from..].find('{') {
        let open = search_from + rel;
        if open > 0 && bytes[open - 1] == b'\\' {
            search_from = open + 1;
            continue;
        }

        let mut depth = 0usize;
        let mut commas = Vec::new();
        let mut close = None;
        for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
            match b {
                b'{' => depth += 1,
                b'}' if depth == 0 => {
                    close = Some(i);
                    break;
                }
                b'}' => depth -= 1,
                b',' if depth == 0 => commas.push(i),
                _ => {}
            }
        }

        let close = close?;

        let inner = &pattern[open + 1..close];
        if !commas.is_empty() {
            let mut alternatives = Vec::with_capacity(commas.len() + 1);
            let mut start = open + 1;
            for comma in commas {
                alternatives.push(pattern[start..comma].to_string());
                start = comma + 1;
            }
            alternatives.push(pattern[start..close].to_string());
            return Some((open, close, alternatives));
        }
        if let Some(range) = expand_range(inner) {
            return Some((open, close, range));
        }

        search_from = open + 1;
    }
    None
}

/// `1..3` → `["1", "2", "3"]`; descending ranges count down.
///
/// Ranges longer than [`MAX_BRACE_EXPANSIONS`] are not expanded.
fn expand_range(inner: &str) -> Option<Vec<String>> {
    let (from, to) = inner.split_once("..")?;
    let from: i64 = from.parse().ok()?;
    let to: i64 = to.parse().ok()?;
    if from.abs_diff(to) >= MAX_BRACE_EXPANSIONS as u64 {
        return None;
    }

    let values: Vec<String> = if from <= to {
        (from..=to).map(|n| n.to_string()).collect()
    } else {
        (to..=from).rev().map(|n| n.to_string()).collect()
    };
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(patterns: &[&str], path: &str) -> bool {
        Selector::new(patterns).is_match(path)
    }

    #[test]
    fn test_default_pattern() {
        for (path, expected) in [
            ("a.html", true),
            ("docs/index.html", true),
            ("a/b/c/d.html", true),
            (r"a\b\c.html", true),
            ("b.txt", false),
            ("a.html.bak", false),
            ("A.HTML", false),
        ] {
            assert_eq!(matches(&["**/*.html"], path), expected, "{path}");
        }
    }

    #[test]
    fn test_star_stays_in_segment() {
        assert!(matches(&["*.html"], "a.html"));
        assert!(!matches(&["*.html"], "docs/a.html"));
        assert!(matches(&["docs/*"], "docs/a.html"));
        assert!(!matches(&["docs/*"], "docs/a/b.html"));
    }

    #[test]
    fn test_globstar_positions() {
        assert!(matches(&["docs/**"], "docs/a/b.html"));
        assert!(matches(&["**/index.html"], "index.html"));
        assert!(matches(&["a/**/z.html"], "a/z.html"));
        assert!(matches(&["a/**/z.html"], "a/b/c/z.html"));
        assert!(!matches(&["a/**/z.html"], "b/z.html"));
    }

    #[test]
    fn test_question_mark_and_class() {
        assert!(matches(&["?.html"], "a.html"));
        assert!(!matches(&["?.html"], "ab.html"));
        assert!(matches(&["[ab].html"], "b.html"));
        assert!(!matches(&["[!ab].html"], "b.html"));
        assert!(matches(&["[!ab].html"], "c.html"));
        assert!(matches(&["[a-c]x"], "bx"));
    }

    #[test]
    fn test_dotfiles_need_explicit_dot() {
        assert!(!matches(&["**/*.html"], ".hidden.html"));
        assert!(!matches(&["**/*.html"], ".git/a.html"));
        assert!(matches(&[".*.html"], ".hidden.html"));
        assert!(matches(&[".git/*.html"], ".git/a.html"));
    }

    #[test]
    fn test_negation_subtracts() {
        let patterns = ["**/*.html", "!drafts/**"];
        assert!(matches(&patterns, "posts/a.html"));
        assert!(!matches(&patterns, "drafts/a.html"));

        // order matters: a later positive re-adds
        let patterns = ["**/*.html", "!drafts/**", "drafts/keep.html"];
        assert!(matches(&patterns, "drafts/keep.html"));
    }

    #[test]
    fn test_lone_negation_selects_nothing() {
        assert!(!matches(&["!*.txt"], "a.html"));
    }

    #[test]
    fn test_braces() {
        let patterns = ["*.{html,htm}"];
        assert!(matches(&patterns, "a.html"));
        assert!(matches(&patterns, "a.htm"));
        assert!(!matches(&patterns, "a.xhtml"));

        assert!(matches(&["{posts,docs/{a,b}}/*.html"], "docs/b/x.html"));
        assert!(matches(&["page{1..3}.html"], "page2.html"));
        assert!(!matches(&["page{1..3}.html"], "page4.html"));
        // no comma, no range: literal
        assert!(matches(&["{x}.html"], "{x}.html"));
    }

    #[test]
    fn test_extglob() {
        assert!(matches(&["@(index|about).html"], "about.html"));
        assert!(!matches(&["@(index|about).html"], "contact.html"));
        assert!(matches(&["page?(s).html"], "page.html"));
        assert!(matches(&["page?(s).html"], "pages.html"));
        assert!(matches(&["+(ab).html"], "abab.html"));
        assert!(!matches(&["+(ab).html"], ".html"));
        assert!(matches(&["x*(ab).txt"], "x.txt"));
        assert!(matches(&["x*(ab).txt"], "xabab.txt"));
    }

    #[test]
    fn test_negated_extglob() {
        let patterns = ["!(drafts)/*.html"];
        assert!(matches(&patterns, "posts/a.html"));
        assert!(!matches(&patterns, "drafts/a.html"));
        assert!(matches(&patterns, "drafts2/a.html"));
        assert!(!matches(&patterns, ".git/a.html"));

        assert!(matches(&["*.!(txt)"], "a.html"));
        assert!(!matches(&["*.!(txt)"], "a.txt"));
        assert!(!matches(&["*.!(txt|md)"], "a.md"));
        assert!(matches(&["!(*.txt)"], "a.html"));
        assert!(!matches(&["!(*.txt)"], "a.txt"));
    }

    #[test]
    fn test_negated_extglob_with_pattern_negation() {
        // leading `!` before `!(` still negates the whole pattern
        let patterns = ["**/*.html", "!!(posts)/*.html"];
        assert!(matches(&patterns, "posts/a.html"));
        assert!(!matches(&patterns, "docs/a.html"));
        assert!(matches(&patterns, "a.html"));
    }

    #[test]
    fn test_negated_extglob_unclosed_is_literal() {
        assert!(matches(&["!(a.html"], "!(a.html"));
    }

    #[test]
    fn test_huge_range_stays_literal() {
        let selector = Selector::new(&["p{1..100000000}.html"]);
        assert_eq!(selector.globs.len(), 1);
        assert!(selector.is_match("p{1..100000000}.html"));
        assert!(!selector.is_match("p5.html"));
    }

    #[test]
    fn test_brace_expansion_is_capped() {
        let nested = "{a,b}".repeat(14);
        let selector = Selector::new(&[format!("{nested}.html")]);
        assert_eq!(selector.globs.len(), 1);
        assert!(selector.is_match(&format!("{nested}.html")));

        // ten groups stay under the cap and expand normally
        let nested = "{a,b}".repeat(10);
        let selector = Selector::new(&[format!("{nested}.html")]);
        assert_eq!(selector.globs.len(), MAX_BRACE_EXPANSIONS);
        assert!(selector.is_match("abababbbaa.html"));
    }

    #[test]
    fn test_literal_fallbacks() {
        assert!(matches(&["[abc.html"], "[abc.html"));
        assert!(matches(&["a+b.html"], "a+b.html"));
        assert!(matches(&[r"\*.html"], "*.html"));
        assert!(!matches(&[r"\*.html"], "a.html"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches(&["**/*.html"], "Docs/A.HTML"));
        assert!(matches(&["**/*.HTML"], "Docs/A.HTML"));
    }

    #[test]
    fn test_empty_patterns_select_nothing() {
        assert!(!matches(&[""], "a.html"));
        assert!(!Selector::new::<&str>(&[]).is_match("a.html"));
    }

    #[test]
    fn test_select_keeps_input_order() {
        let selector = Selector::new(&["**/*.html"]);
        let picked = selector.select(["z.html", "a.txt", "m/a.html", "b.html"]);
        assert_eq!(picked, ["z.html", "m/a.html", "b.html"]);
    }
}
