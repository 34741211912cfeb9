//! Content identifier parsing.
//!
//! Content ids are URIs of the form `ekn://<domain>/<hash>[/<member>]`, or
//! `ekn+zim://<domain>/<escaped article url>` for content imported from ZIM
//! archives. The id field in the index stores the hash (or unescaped URL).

const EKN_SCHEME: &str = "ekn://";
const EKN_ZIM_SCHEME: &str = "ekn+zim://";

/// Extract the indexed content hash from an id.
///
/// This is a best-effort parse: anything that is not a recognised id yields
/// `None` rather than an error.
pub fn extract_content_hash(id: &str) -> Option<String> {
    if let Some(rest) = id.strip_prefix(EKN_SCHEME) {
        // <domain>/<hash>[/<member>]
        return rest
            .split('/')
            .nth(1)
            .filter(|hash| !hash.is_empty())
            .map(str::to_string);
    }

    if let Some(rest) = id.strip_prefix(EKN_ZIM_SCHEME) {
        // <domain>/<url>, the url may contain further slashes
        let (_, url) = rest.split_once('/')?;
        let decoded = urlencoding::decode(url).ok()?;
        if decoded.is_empty() || decoded.contains('\0') {
            return None;
        }
        return Some(decoded.into_owned());
    }

    None
}
