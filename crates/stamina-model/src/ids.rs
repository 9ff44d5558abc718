#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Short code of a classification family, always upper case ("ISIC", "NACE").
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FamilyCode(String);

impl FamilyCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(ModelError::InvalidFamily(value));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// For compile-time family constants, which are known to be valid.
    pub fn from_static(value: &'static str) -> Self {
        Self(value.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version label as published ("4", "2.1", "2008").
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VersionLabel(String);

impl VersionLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidVersion(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version token used in identifiers: the label with dots removed.
    pub fn token(&self) -> String {
        self.0.replace('.', "")
    }

    /// Leading integer of the label, if any ("2002" -> 2002, "1.1" -> 1).
    pub fn leading_number(&self) -> Option<u32> {
        let digits: String = self.0.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `(family, version)` pair. Owns exactly one scheme once built.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ClassificationVersion {
    pub family: FamilyCode,
    pub version: VersionLabel,
}

impl ClassificationVersion {
    pub fn new(family: FamilyCode, version: VersionLabel) -> Self {
        Self { family, version }
    }

    /// Parse both parts, e.g. `ClassificationVersion::parse("NACE", "2")`.
    pub fn parse(family: &str, version: &str) -> Result<Self, ModelError> {
        Ok(Self {
            family: FamilyCode::new(family)?,
            version: VersionLabel::new(version)?,
        })
    }
}

impl fmt::Display for ClassificationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.version)
    }
}

/// A resolved resource identifier (an absolute URI in practice).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
