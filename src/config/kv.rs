//! Flat `key = value` parsing.
use std::collections::BTreeMap;

/// Split a recognized line into its lowercased key and raw value.
///
/// A recognized line starts with one or more ASCII letters or underscores,
/// then optional whitespace, `=`, optional whitespace, and the value up to the
/// end of the line. Anything else (comments, blank lines, indented keys,
/// digits in the key) is not a config line.
fn parse_line(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim_end_matches([' ', '\t']);
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    Some((key.to_ascii_lowercase(), value.trim_start_matches([' ', '\t'])))
}

/// Parse config file content into a key/value map.
///
/// CRLF line endings are normalized first. Keys are lowercased and later
/// duplicates overwrite earlier ones. Values are kept verbatim, including
/// trailing whitespace.
///
/// # Examples
///
/// ```
/// use bootconfig::config::kv::parse_from_str;
///
/// let map = parse_from_str("hostname=foo\n# comment\n\nwifi_ssid = bar \n");
/// assert_eq!(map.len(), 2);
/// assert_eq!(map["hostname"], "foo");
/// assert_eq!(map["wifi_ssid"], "bar ");
/// ```
#[must_use]
pub fn parse_from_str(content: &str) -> BTreeMap<String, String> {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .split('\n')
        .filter_map(parse_line)
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}
