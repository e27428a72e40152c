//! Display labels derived from type names.
//!
//! `HttpServer` becomes `HTTP-SERVER`, and with an instance ordinal
//! `HTTP-SERVER-03`.

/// Minimum width of the zero-padded instance ordinal.
pub const ORDINAL_WIDTH: usize = 2;

/// Builds the label shown between brackets in every log line.
///
/// A dash is inserted at each lowercase-to-uppercase boundary and the whole
/// result is uppercased. When `ordinal` is present it is appended after a
/// dash, zero-padded to [`ORDINAL_WIDTH`] digits.
///
/// ```
/// use taglog::format_label;
///
/// assert_eq!(format_label("HttpServer", None), "HTTP-SERVER");
/// assert_eq!(format_label("HttpServer", Some(7)), "HTTP-SERVER-07");
/// ```
pub fn format_label(type_name: &str, ordinal: Option<u64>) -> String {
    let mut label = upper_to_dashed(type_name);
    if let Some(n) = ordinal {
        label.push('-');
        label.push_str(&pad_number(n, ORDINAL_WIDTH));
    }
    label
}

/// Left-pads `n` with zeros to at least `width` digits. Never truncates.
pub fn pad_number(n: u64, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

fn upper_to_dashed(name: &str) -> String {
    let mut dashed = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            dashed.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        dashed.push(c);
    }
    dashed.to_uppercase()
}

/// Reduces a fully qualified Rust type name to the bare type identifier.
///
/// `my_app::net::HttpServer<u8>` becomes `HttpServer`.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = match full.find('<') {
        Some(idx) => &full[..idx],
        None => full,
    };
    match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_boundaries() {
        assert_eq!(format_label("HttpServer", None), "HTTP-SERVER");
        assert_eq!(format_label("fooBarBaz", None), "FOO-BAR-BAZ");
        assert_eq!(format_label("X", None), "X");
    }

    #[test]
    fn test_acronyms_are_not_split() {
        assert_eq!(format_label("HTTPServer", None), "HTTPSERVER");
        assert_eq!(format_label("parseURL", None), "PARSE-URL");
    }

    #[test]
    fn test_non_letters_break_boundaries() {
        assert_eq!(format_label("Worker2Pool", None), "WORKER2POOL");
        assert_eq!(format_label("snake_Case", None), "SNAKE_CASE");
        assert_eq!(format_label("", None), "");
    }

    #[test]
    fn test_ordinal_suffix_padding() {
        assert_eq!(format_label("HttpServer", Some(0)), "HTTP-SERVER-00");
        assert_eq!(format_label("HttpServer", Some(12)), "HTTP-SERVER-12");
        assert_eq!(format_label("HttpServer", Some(123)), "HTTP-SERVER-123");
    }

    #[test]
    fn test_pad_number() {
        assert_eq!(pad_number(5, 2), "05");
        assert_eq!(pad_number(5, 0), "5");
        assert_eq!(pad_number(4567, 3), "4567");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("HttpServer"), "HttpServer");
        assert_eq!(short_type_name("my_app::net::HttpServer"), "HttpServer");
        assert_eq!(
            short_type_name("my_app::Pool<alloc::string::String>"),
            "Pool"
        );
    }
}
