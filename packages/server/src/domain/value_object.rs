//! Value objects of the relay domain.

use std::fmt;

use uuid::Uuid;

use super::{error::ValueObjectError, sanitize::sanitize_text};

/// Minimum number of characters a display name must keep after sanitization.
pub const MIN_DISPLAY_NAME_CHARS: usize = 2;

/// Opaque, server-generated handle for one transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random handle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an accepted chat event. Never supplied by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatEventId(Uuid);

impl ChatEventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChatEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sanitized participant name attached to a connection on join.
///
/// Construction runs [`sanitize_text`] and then requires at least
/// [`MIN_DISPLAY_NAME_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let sanitized = sanitize_text(raw);
        let chars = sanitized.chars().count();
        if chars == 0 {
            return Err(ValueObjectError::Empty);
        }
        if chars < MIN_DISPLAY_NAME_CHARS {
            return Err(ValueObjectError::TooShort {
                min: MIN_DISPLAY_NAME_CHARS,
                actual: chars,
            });
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitized, non-empty chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let sanitized = sanitize_text(raw);
        if sanitized.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sanitize::MAX_TEXT_CHARS;

    #[test]
    fn test_display_name_accepts_two_characters() {
        // テスト項目: 2 文字の名前は受け付けられる
        // given (前提条件):
        let raw = "al";

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "al");
    }

    #[test]
    fn test_display_name_rejects_single_character() {
        // テスト項目: 1 文字の名前は TooShort で拒否される
        // given (前提条件):
        let raw = "a";

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooShort { min: 2, actual: 1 })
        );
    }

    #[test]
    fn test_display_name_length_is_checked_after_sanitization() {
        // テスト項目: サニタイズ後の長さで判定される（`<a>` は 1 文字扱い）
        // given (前提条件):
        let raw = "   <a>   ";

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooShort { min: 2, actual: 1 })
        );
    }

    #[test]
    fn test_display_name_cannot_pad_with_whitespace_inside_brackets() {
        // テスト項目: 括弧内の空白で 2 文字に水増しした名前は拒否される
        // given (前提条件):
        let raw = "<  a>";

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooShort { min: 2, actual: 1 })
        );
    }

    #[test]
    fn test_display_name_rejects_blank() {
        // テスト項目: 空白のみの名前は Empty で拒否される
        // given (前提条件):
        let raw = "    ";

        // when (操作):
        let result = DisplayName::try_from(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty));
    }

    #[test]
    fn test_display_name_is_truncated_like_messages() {
        // テスト項目: 名前にもメッセージと同じ 1000 文字の上限が適用される
        // given (前提条件):
        let raw = "n".repeat(MAX_TEXT_CHARS * 2);

        // when (操作):
        let name = DisplayName::new(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str().chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_message_text_rejects_markup_only_input() {
        // テスト項目: サニタイズ後に空になるメッセージは拒否される
        // given (前提条件):
        let raw = "<>";

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty));
    }

    #[test]
    fn test_message_text_sanitizes_content() {
        // テスト項目: メッセージ本文がサニタイズされる
        // given (前提条件):
        let raw = "  hi <script>  ";

        // when (操作):
        let text = MessageText::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "hi script");
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成される ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
