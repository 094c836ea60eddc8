/// Join URL segments with exactly one `/` between them.
///
/// Leading slashes of the first segment and the scheme separator (`://`) are
/// preserved, empty segments are skipped, and a slash directly in front of a
/// query string or fragment is dropped.
pub fn url_join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();

    for part in parts {
        let part = part.as_ref().trim();
        if part.is_empty() {
            continue;
        }

        if joined.is_empty() {
            joined.push_str(part.trim_end_matches('/'));
            if joined.is_empty() {
                joined.push('/');
            }
            continue;
        }

        let segment = part.trim_matches('/');
        if segment.is_empty() {
            continue;
        }

        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(segment);
    }

    joined.replace("/?", "?").replace("/#", "#")
}

pub fn is_localhost(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1")
}
