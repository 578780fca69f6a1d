//! Canonical URL construction.
//!
//! A relative path becomes an absolute URL through five fixed stages:
//!
//! ```text
//! a\b\c\index.html
//!   │ omit_index            (omit_index = true)
//!   ▼
//! a\b\c\
//!   │ omit_extensions       (omit_extensions non-empty)
//!   │ normalize_separators
//!   ▼
//! a/b/c/
//!   │ join_host
//!   ▼
//! http://localhost:8080/a/b/c/
//!   │ trim_trailing_slashes (omit_trailing_slashes = true)
//!   ▼
//! http://localhost:8080/a/b/c
//! ```

use std::borrow::Cow;

use crate::config::CanonicalOptions;

/// Literal tail removed by `omit_index`.
pub const INDEX_SUFFIX: &str = "index.html";

/// Build the canonical URL for `path` under `hostname`.
///
/// Pure: the result depends only on the arguments.
pub fn build_url(path: &str, hostname: &str, options: &CanonicalOptions) -> String {
    let mut url = path;

    if options.omit_index {
        url = omit_index(url);
    }
    url = omit_extensions(url, options.omit_extensions());

    let joined = join_host(hostname, &normalize_separators(url));

    if options.omit_trailing_slashes {
        trim_trailing_slashes(&joined).to_string()
    } else {
        joined
    }
}

/// Remove a trailing `index.html`.
///
/// Plain suffix test, not segment-aware: `fooindex.html` loses its tail too.
pub fn omit_index(path: &str) -> &str {
    path.strip_suffix(INDEX_SUFFIX).unwrap_or(path)
}

/// Strip the first matching extension, choosing the lexicographically
/// smallest result when several extensions match.
///
/// A strip that would leave nothing is not a candidate.
pub fn omit_extensions<'a>(path: &'a str, extensions: &[String]) -> &'a str {
    extensions
        .iter()
        .filter_map(|ext| path.strip_suffix(ext.as_str()))
        .filter(|stripped| !stripped.is_empty())
        .min()
        .unwrap_or(path)
}

/// Rewrite backslashes and the platform separator to `/`.
pub fn normalize_separators(path: &str) -> Cow<'_, str> {
    let is_sep =
        |c: char| c == '\\' || (std::path::MAIN_SEPARATOR != '/' && c == std::path::MAIN_SEPARATOR);
    if path.contains(is_sep) {
        Cow::Owned(path.replace(is_sep, "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Join with exactly one `/` between host and path.
pub fn join_host(hostname: &str, path: &str) -> String {
    format!(
        "{}/{}",
        hostname.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Strip every trailing `/`.
#[inline]
pub fn trim_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "http://localhost:8080";

    fn options(omit_index: bool, omit_trailing_slashes: bool) -> CanonicalOptions {
        CanonicalOptions {
            omit_index,
            omit_trailing_slashes,
            ..CanonicalOptions::with_hostname(HOST)
        }
    }

    fn with_extensions(exts: &[&str]) -> CanonicalOptions {
        CanonicalOptions {
            omit_extensions: Some(exts.iter().map(|e| e.to_string()).collect()),
            ..CanonicalOptions::with_hostname(HOST)
        }
    }

    #[test]
    fn test_backslashes_become_slashes() {
        let url = build_url(r"a\b\c.html", HOST, &CanonicalOptions::default());
        assert_eq!(url, "http://localhost:8080/a/b/c.html");
    }

    #[test]
    fn test_omit_index_and_trailing_slash() {
        let path = r"a\b\c\index.html";
        assert_eq!(
            build_url(path, HOST, &options(true, true)),
            "http://localhost:8080/a/b/c"
        );
        assert_eq!(
            build_url(path, HOST, &options(true, false)),
            "http://localhost:8080/a/b/c/"
        );
    }

    #[test]
    fn test_omit_index_only_strips_tail() {
        let url = build_url(r"a\index.html\c\index.html", HOST, &options(true, false));
        assert_eq!(url, "http://localhost:8080/a/index.html/c/");
    }

    #[test]
    fn test_omit_index_requires_exact_suffix() {
        let url = build_url(r"a\b\c\indexhtml.html", HOST, &options(true, true));
        assert_eq!(url, "http://localhost:8080/a/b/c/indexhtml.html");
    }

    #[test]
    fn test_omit_index_is_not_segment_aware() {
        assert_eq!(omit_index("foo/index.html"), "foo/");
        assert_eq!(omit_index("fooindex.html"), "foo");
        assert_eq!(omit_index("index.html"), "");
        assert_eq!(omit_index("index.htm"), "index.htm");
    }

    #[test]
    fn test_root_index() {
        let host = "http://www.website.com/";
        assert_eq!(
            build_url("index.html", host, &options(true, true)),
            "http://www.website.com"
        );
        assert_eq!(
            build_url("index.html", host, &options(true, false)),
            "http://www.website.com/"
        );
    }

    #[test]
    fn test_omit_extensions_smallest_candidate_wins() {
        let url = build_url(
            r"a\index.html\c\foo.bar.html",
            HOST,
            &with_extensions(&[".html", ".bar.html"]),
        );
        assert_eq!(url, "http://localhost:8080/a/index.html/c/foo");

        // Listing order does not matter.
        let url = build_url(
            r"a\index.html\c\foo.bar.html",
            HOST,
            &with_extensions(&[".bar.html", ".html"]),
        );
        assert_eq!(url, "http://localhost:8080/a/index.html/c/foo");
    }

    #[test]
    fn test_omit_extensions_no_match() {
        assert_eq!(omit_extensions("a/b.txt", &[".html".into()]), "a/b.txt");
        assert_eq!(omit_extensions("a/b.txt", &[]), "a/b.txt");
    }

    #[test]
    fn test_omit_extensions_never_empties_path() {
        assert_eq!(omit_extensions(".html", &[".html".into()]), ".html");
    }

    #[test]
    fn test_omit_index_runs_before_extensions() {
        let opts = CanonicalOptions {
            omit_index: true,
            omit_extensions: Some(vec![".html".into()]),
            ..CanonicalOptions::with_hostname(HOST)
        };
        assert_eq!(
            build_url("docs/index.html", HOST, &opts),
            "http://localhost:8080/docs"
        );
        assert_eq!(
            build_url("docs/intro.html", HOST, &opts),
            "http://localhost:8080/docs/intro"
        );
    }

    #[test]
    fn test_join_host_single_slash() {
        for (host, path) in [
            ("http://x.com", "a"),
            ("http://x.com/", "a"),
            ("http://x.com", "/a"),
            ("http://x.com//", "//a"),
        ] {
            assert_eq!(join_host(host, path), "http://x.com/a", "{host} + {path}");
        }
        assert_eq!(join_host("http://x.com/blog/", "a"), "http://x.com/blog/a");
    }

    #[test]
    fn test_trim_trailing_slashes() {
        assert_eq!(trim_trailing_slashes("http://x.com/a///"), "http://x.com/a");
        assert_eq!(trim_trailing_slashes("http://x.com/a"), "http://x.com/a");
    }

    #[test]
    fn test_normalize_separators_borrows_when_clean() {
        assert!(matches!(normalize_separators("a/b.html"), Cow::Borrowed(_)));
        assert!(matches!(normalize_separators("a/b/c/"), Cow::Borrowed(_)));
        assert_eq!(normalize_separators(r"a\b.html"), "a/b.html");
        assert_eq!(normalize_separators(r"a/b\c.html"), "a/b/c.html");
    }
}
