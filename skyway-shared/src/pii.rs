use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for sensitive values. `Debug`/`Display` always redact, so a
/// `tracing::info!("{:?}", req)` cannot leak a passport or token; explicit
/// serialization still emits the real value for API responses that need it.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Redact all but the trailing `keep` characters: `masked_tail("P1234567", 3)`
/// is `"*****567"`.
pub fn masked_tail(value: &str, keep: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= keep {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - keep..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - keep), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_value() {
        let secret = Masked("P1234567".to_string());
        assert_eq!(format!("{:?}", secret), "********");
        assert_eq!(format!("{}", secret), "********");
    }

    #[test]
    fn masked_tail_keeps_suffix() {
        assert_eq!(masked_tail("P1234567", 3), "*****567");
        assert_eq!(masked_tail("AB", 3), "**");
        assert_eq!(masked_tail("", 4), "");
    }
}
