//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! ログイン、画面表示、検索に使用される。
//!
//! ## 設計方針
//! - ASCII文字のみ許可（a-z, 0-9, _ . -）
//! - 大文字入力は受け付けるが、保存形は常に小文字
//! - NFKC正規化 → 小文字化 → 検証 の順で処理
//!
//! ## 不変条件
//! - 長さ: 3〜30文字（正規化後）
//! - 先頭・末尾: 英数字または `_`
//! - 英数字を最低1文字含む（記号のみ禁止）
//! - 空白禁止

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too short
    TooShort { length: usize, min: usize },

    /// User name is too long
    TooLong { length: usize, max: usize },

    /// User name contains invalid character
    InvalidCharacter { char: char },

    /// User name starts or ends with a non-alphanumeric character
    InvalidBoundary { char: char },

    /// User name contains no alphanumeric characters
    NoAlphanumeric,
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "Username is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Username is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char } => {
                write!(
                    f,
                    "Invalid character '{char}' in username. Only a-z, 0-9, _, ., - are allowed"
                )
            }
            Self::InvalidBoundary { char } => {
                write!(
                    f,
                    "Username cannot start or end with '{char}'. Use a-z, 0-9, or _"
                )
            }
            Self::NoAlphanumeric => {
                write!(f, "Username must contain at least one letter or digit")
            }
        }
    }
}

impl std::error::Error for UserNameError {}

/// Validated, normalized user name
///
/// # Invariants
/// - Always stored in canonical lowercase form
/// - Length between USER_NAME_MIN_LENGTH and USER_NAME_MAX_LENGTH
/// - Contains only ASCII alphanumeric, `_`, `.`, `-`
/// - Starts and ends with alphanumeric or underscore
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Create a new UserName from raw input
    ///
    /// Applies normalization (NFKC, trim, lowercase) and validates.
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let canonical = Self::normalize(input.as_ref());
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Create from database value (assumes already validated)
    pub fn from_db(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    /// Get the canonical (lowercase) user name
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Normalize input string (trim, NFKC, lowercase)
    fn normalize(input: &str) -> String {
        input
            .nfkc()
            .collect::<String>()
            .trim()
            .to_lowercase()
    }

    /// Validate the normalized user name
    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for ch in canonical.chars() {
            if !Self::is_valid_char(ch) {
                return Err(UserNameError::InvalidCharacter { char: ch });
            }
        }

        // canonical is non-empty here
        let first = canonical.chars().next().ok_or(UserNameError::Empty)?;
        let last = canonical.chars().next_back().ok_or(UserNameError::Empty)?;
        if !Self::is_valid_boundary_char(first) {
            return Err(UserNameError::InvalidBoundary { char: first });
        }
        if !Self::is_valid_boundary_char(last) {
            return Err(UserNameError::InvalidBoundary { char: last });
        }

        if !canonical.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::NoAlphanumeric);
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
    }

    #[inline]
    fn is_valid_boundary_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = UserName::new("  alice  ").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_lowercase() {
            let name = UserName::new("ALICE").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_mixed_case() {
            let name = UserName::new("AlIcE_123").unwrap();
            assert_eq!(name.as_str(), "alice_123");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) becomes ASCII after NFKC, then lowercased
            let name = UserName::new("Ａlice").unwrap();
            assert_eq!(name.as_str(), "alice");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert!(matches!(UserName::new(""), Err(UserNameError::Empty)));
        }

        #[test]
        fn test_whitespace_only_fails() {
            assert!(matches!(UserName::new("   "), Err(UserNameError::Empty)));
        }

        #[test]
        fn test_too_short() {
            assert!(matches!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            ));
        }

        #[test]
        fn test_minimum_length() {
            assert!(UserName::new("abc").is_ok());
        }

        #[test]
        fn test_too_long() {
            let input = "a".repeat(USER_NAME_MAX_LENGTH + 1);
            assert!(matches!(
                UserName::new(&input),
                Err(UserNameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_alphanumeric() {
            assert!(UserName::new("alice123").is_ok());
        }

        #[test]
        fn test_valid_separators() {
            assert!(UserName::new("alice_bob").is_ok());
            assert!(UserName::new("alice.bob").is_ok());
            assert!(UserName::new("alice-bob").is_ok());
        }

        #[test]
        fn test_invalid_special_char() {
            assert!(matches!(
                UserName::new("alice@bob"),
                Err(UserNameError::InvalidCharacter { char: '@' })
            ));
        }

        #[test]
        fn test_invalid_unicode() {
            assert!(matches!(
                UserName::new("日本語です"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }

        #[test]
        fn test_whitespace_in_middle_fails() {
            assert!(matches!(
                UserName::new("alice bob"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }
    }

    mod boundary_validation {
        use super::*;

        #[test]
        fn test_start_with_underscore() {
            assert!(UserName::new("_alice").is_ok());
        }

        #[test]
        fn test_start_with_dot_fails() {
            assert!(matches!(
                UserName::new(".alice"),
                Err(UserNameError::InvalidBoundary { char: '.' })
            ));
        }

        #[test]
        fn test_end_with_hyphen_fails() {
            assert!(matches!(
                UserName::new("alice-"),
                Err(UserNameError::InvalidBoundary { char: '-' })
            ));
        }

        #[test]
        fn test_symbols_only_fails() {
            assert!(matches!(
                UserName::new("___"),
                Err(UserNameError::NoAlphanumeric)
            ));
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = UserName::new("alice").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"alice\"");
        }

        #[test]
        fn test_deserialize_with_normalization() {
            let name: UserName = serde_json::from_str("\"ALICE\"").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_deserialize_invalid() {
            let result: Result<UserName, _> = serde_json::from_str("\"ab\"");
            assert!(result.is_err());
        }
    }
}
