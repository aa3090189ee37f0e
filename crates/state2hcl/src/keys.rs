//! classification of flat path segments and hcl literal quoting

/// Element count of a list or set (`ports.#`)
pub const COUNT_MARKER: &str = "#";
/// Size of a map (`tags.%`)
pub const SIZE_MARKER: &str = "%";

/// Segments that only carry collection metadata
pub fn is_marker(segment: &str) -> bool {
    segment == COUNT_MARKER || segment == SIZE_MARKER
}

/// Parses a segment used as collection index
///
/// Only plain decimal digits are accepted (no sign, no whitespace).
pub fn parse_index(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    segment.parse().ok()
}

/// Content hash used by the state writer to key set elements
///
/// CRC-32 (IEEE) of the utf-8 bytes. The writer converts the checksum to a
/// platform int which is never negative on 64-bit targets.
pub fn hashcode(value: &str) -> u64 {
    u64::from(crc32fast::hash(value.as_bytes()))
}

/// `true` if `segment` is the set key the state writer derives for `value`
pub fn is_set_key(segment: &str, value: &str) -> bool {
    parse_index(segment).is_some_and(|index| index == hashcode(value))
}

/// Keys must start with a letter or `_` to be written without quotes
///
/// Non-ascii letters follow what hcl accepts as start of an identifier
/// (unicode `ID_Start`): letter numbers such as `Ⅻ` count, combining marks
/// do not.
pub fn is_bare_key(key: &str) -> bool {
    key.chars().next().is_some_and(|head| {
        head.is_ascii_alphabetic()
            || head == '_'
            || (!head.is_ascii() && hcl::Identifier::new(head.to_string()).is_ok())
    })
}

/// Writes `key` bare or as quoted string, see [is_bare_key]
pub fn key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// `true` if the value survives a round trip through `i64` unchanged
///
/// `007` or `+1` stay strings, their text would change otherwise.
pub fn is_integer(value: &str) -> bool {
    value
        .parse::<i64>()
        .is_ok_and(|int| int.to_string() == value)
}

/// Writes a scalar value, integers unquoted and everything else quoted
pub fn scalar(value: &str) -> String {
    if is_integer(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Quoted hcl string literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');

    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            // template sequences would be interpolated otherwise
            '$' | '%' if chars.peek() == Some(&'{') => {
                quoted.push(ch);
                quoted.push(ch);
            }
            _ => quoted.push(ch),
        }
    }

    quoted.push('"');
    quoted
}
