//! Entity names paired with their comparison key.

use core::fmt;

use crate::normalize::normalize;

/// A state, city or location name as entered, together with its normalized
/// key.
///
/// The key is computed once at construction so the value that gets stored
/// and the value that gets compared can never drift apart.
///
/// ```
/// use client_directory_core::EntityName;
///
/// let name = EntityName::new("Tlaxcala de Xicohténcatl");
/// assert_eq!(name.as_str(), "Tlaxcala de Xicohténcatl");
/// assert_eq!(name.key(), "tlaxcala de xicohtencatl");
/// assert_eq!(EntityName::new("TLAXCALA DE XICOHTENCATL").key(), name.key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityName {
    value: String,
    key: String,
}

impl EntityName {
    /// Build a name, computing its normalized key.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let key = normalize(&value);
        Self { value, key }
    }

    /// The name exactly as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The accent- and case-folded key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consumes the name and returns the original string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for EntityName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kept_verbatim() {
        let name = EntityName::new("Púebla");
        assert_eq!(name.as_str(), "Púebla");
        assert_eq!(name.to_string(), "Púebla");
        assert_eq!(name.into_inner(), "Púebla");
    }

    #[test]
    fn test_key_is_normalized() {
        assert_eq!(EntityName::new("Púebla").key(), "puebla");
        assert_eq!(EntityName::from("PUEBLA").key(), "puebla");
    }
}
