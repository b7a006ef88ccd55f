/// Reduce a URL to the form used for result equality.
///
/// Strips `http://` then `https://`, a leading `www.`, and one trailing `/`.
/// The pass is repeated until the value is stable so that
/// `canonicalize(canonicalize(u)) == canonicalize(u)` holds for every input.
pub fn canonicalize(url: &str) -> String {
    let mut current = url;
    loop {
        let next = strip_once(current);
        if next == current {
            return next.to_string();
        }
        current = next;
    }
}

fn strip_once(url: &str) -> &str {
    let url = url.strip_prefix("http://").unwrap_or(url);
    let url = url.strip_prefix("https://").unwrap_or(url);
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url)
}

pub fn same_result(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}
