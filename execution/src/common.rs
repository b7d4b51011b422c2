//! FILENAME: execution/src/common.rs
//! Small helpers shared by the transforms.

/// Separator between an attribute URI and its element id.
const ELEMENT_ID_SEPARATOR: &str = "/elements?id=";

/// Parses a raw result value into a finite number.
/// Empty, non-numeric and non-finite strings yield `None`.
pub fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts the element id from an attribute element URI
/// (`/gdc/md/<project>/obj/<attr>/elements?id=<id>`).
/// URIs without an element part are returned unchanged.
pub fn get_attribute_element_id_from_uri(uri: &str) -> &str {
    match uri.rfind(ELEMENT_ID_SEPARATOR) {
        Some(pos) => &uri[pos + ELEMENT_ID_SEPARATOR.len()..],
        None => uri,
    }
}

/// Reverts HTML escaping of angle brackets that the engine applies to element names.
pub fn unescape_angle_brackets(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&#60;", "<")
        .replace("&gt;", ">")
        .replace("&#62;", ">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), Some(42.0));
        assert_eq!(parse_value(" -1.5 "), Some(-1.5));
        assert_eq!(parse_value("1e3"), Some(1000.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn test_element_id_from_uri() {
        assert_eq!(
            get_attribute_element_id_from_uri("/gdc/md/p1/obj/4/elements?id=1234"),
            "1234"
        );
        assert_eq!(get_attribute_element_id_from_uri("plain"), "plain");
    }

    #[test]
    fn test_unescape_angle_brackets() {
        assert_eq!(unescape_angle_brackets("&lt;empty&gt;"), "<empty>");
        assert_eq!(unescape_angle_brackets("a &#60;b&#62;"), "a <b>");
    }
}
