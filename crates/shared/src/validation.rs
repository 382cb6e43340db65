//! Common validation utilities.

/// Length of every generated entity identifier (users, teams, channels).
pub const ID_LENGTH: usize = 26;

lazy_static::lazy_static! {
    static ref ID_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9]{26}$").unwrap();
}

/// Returns true if `value` is a syntactically valid entity identifier.
///
/// Identifiers are exactly 26 ASCII letters or digits. This only checks the
/// format; it says nothing about whether the entity exists.
pub fn is_valid_id(value: &str) -> bool {
    value.len() == ID_LENGTH && ID_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("abcdefghijklmnopqrstuvwxyz"));
        assert!(is_valid_id("4xp9fdt77pncbef59f4k1qe83o"));
        assert!(is_valid_id("ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
    }

    #[test]
    fn test_is_valid_id_wrong_length() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("abc"));
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwxy"));
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwxyz1"));
    }

    #[test]
    fn test_is_valid_id_bad_characters() {
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwxy-"));
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwxy "));
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwx_z"));
    }

    #[test]
    fn test_is_valid_id_rejects_multibyte_letters() {
        // 25 ASCII letters plus one two-byte letter is 27 bytes
        assert!(!is_valid_id("abcdefghijklmnopqrstuvwxyé"));
        assert!(!is_valid_id("ééééééééééééé"));
    }
}
