use percent_encoding::percent_decode_str;

/// Returns the decoded value of `name` from a `Cookie`-style header string.
///
/// Entries are `;`-separated and matched on the exact `name=` prefix, so
/// `csrftoken` does not match `csrftoken_old=...`. The first match wins.
pub fn get_cookie(header: &str, name: &str) -> Option<String> {
    if header.trim().is_empty() {
        return None;
    }
    let prefix = format!("{name}=");
    header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cookie_by_exact_name() {
        let header = "sessionid=abc; csrftoken=tok%2B123; theme=dark";
        assert_eq!(get_cookie(header, "csrftoken").as_deref(), Some("tok+123"));
        assert_eq!(get_cookie(header, "theme").as_deref(), Some("dark"));
    }

    #[test]
    fn ignores_longer_names_sharing_a_prefix() {
        let header = "csrftoken_old=stale; csrftoken=fresh";
        assert_eq!(get_cookie(header, "csrftoken").as_deref(), Some("fresh"));
    }

    #[test]
    fn missing_or_empty_header_yields_none() {
        assert_eq!(get_cookie("", "csrftoken"), None);
        assert_eq!(get_cookie("sessionid=abc", "csrftoken"), None);
    }
}
