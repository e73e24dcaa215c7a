use std::borrow::Cow;

pub(super) fn log_status(enabled: bool, label: &str, message: impl AsRef<str>) {
    if enabled {
        println!("[{}] {}", label, message.as_ref());
    }
}

/// Invalid UTF-8 sequences become U+FFFD; the rest of the document is kept.
pub(super) fn decode_markdown(bytes: &[u8], verbose: bool) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, Cow::Owned(_)) {
        log_status(
            verbose,
            "WARN",
            "Input is not valid UTF-8; invalid sequences were replaced",
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_is_borrowed() {
        let decoded = decode_markdown("# Café".as_bytes(), false);
        assert!(matches!(decoded, Cow::Borrowed("# Café")));
    }

    #[test]
    fn invalid_bytes_are_replaced_not_dropped() {
        let decoded = decode_markdown(b"before \xff\xfe after", false);
        assert_eq!(decoded, "before \u{FFFD}\u{FFFD} after");
    }
}
