// Cookie parsing: turns the raw string a user copies from the browser's
// Network tab (the `Cookie` request header) into a name→value map.

use std::collections::BTreeMap;

/// Parsed cookie set. A `BTreeMap` keeps the on-disk serialization
/// order deterministic.
pub type CookieMap = BTreeMap<String, String>;

/// Cookie names the build service sets during login. Their absence
/// usually means the string was copied from the wrong place (for
/// example the JavaScript console, which cannot see HttpOnly cookies).
pub const AUTH_COOKIE_NAMES: [&str; 2] = [
    "__Secure-next-auth.session-token",
    "__Host-next-auth.csrf-token",
];

/// Parse a cookie header string into a map.
///
/// Segments are separated by `;` and trimmed; each segment is split
/// once on the first `=` into name and value. Segments without `=` are
/// skipped. If a name repeats, the last occurrence wins.
pub fn parse_cookie_string(cookie_string: &str) -> CookieMap {
    let mut cookies = CookieMap::new();
    for segment in cookie_string.split(';') {
        let segment = segment.trim();
        if let Some((name, value)) = segment.split_once('=') {
            cookies.insert(name.to_string(), value.to_string());
        }
    }
    cookies
}

/// Which of the expected authentication cookies are absent from `cookies`.
/// An empty result means the set looks complete.
pub fn missing_auth_cookies(cookies: &CookieMap) -> Vec<&'static str> {
    AUTH_COOKIE_NAMES
        .iter()
        .copied()
        .filter(|name| !cookies.contains_key(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments_with_uneven_spacing() {
        let cookies = parse_cookie_string("a=1; b=2;c=3");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "2");
        assert_eq!(cookies["c"], "3");
    }

    #[test]
    fn skips_segments_without_equals() {
        let cookies = parse_cookie_string("a=1; justkey; b=2");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "2");
    }

    #[test]
    fn empty_string_yields_empty_map() {
        assert!(parse_cookie_string("").is_empty());
    }

    #[test]
    fn splits_only_on_first_equals() {
        let cookies = parse_cookie_string("token=abc=def==");
        assert_eq!(cookies["token"], "abc=def==");
    }

    #[test]
    fn duplicate_name_last_wins() {
        let cookies = parse_cookie_string("a=1; a=2");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["a"], "2");
    }

    #[test]
    fn empty_value_is_kept() {
        let cookies = parse_cookie_string("flag=");
        assert_eq!(cookies["flag"], "");
    }

    #[test]
    fn reports_missing_auth_cookies() {
        let cookies = parse_cookie_string("__Secure-next-auth.session-token=tok");
        assert_eq!(
            missing_auth_cookies(&cookies),
            vec!["__Host-next-auth.csrf-token"]
        );

        let both = parse_cookie_string(
            "__Secure-next-auth.session-token=tok; __Host-next-auth.csrf-token=csrf",
        );
        assert!(missing_auth_cookies(&both).is_empty());

        assert_eq!(
            missing_auth_cookies(&CookieMap::new()),
            AUTH_COOKIE_NAMES.to_vec()
        );
    }
}
