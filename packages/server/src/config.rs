//! Server configuration.

use thiserror::Error;

use crate::domain::{
    RateLimitPolicy,
    rate_limit::{DEFAULT_CHAT_MESSAGES_PER_WINDOW, DEFAULT_CHAT_WINDOW_MILLIS},
};

/// Default inbound WebSocket frame/message limit (16 KiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024;

const MAX_ALLOWED_FRAME_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("{field} must be greater than 0")]
    Zero { field: &'static str },

    #[error("{field} exceeds reasonable limit ({limit})")]
    TooLarge { field: &'static str, limit: u64 },
}

/// Runtime configuration for the relay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to bind to (`0` picks an ephemeral port).
    pub port: u16,
    /// Origin accepted on WebSocket upgrade. `None` or `"*"` accepts any.
    pub allowed_origin: Option<String>,
    /// Maximum inbound frame/message size in bytes.
    pub max_frame_bytes: usize,
    /// Accepted chats per window per connection.
    pub rate_limit_max_messages: u32,
    /// Rate-limit window length in seconds.
    pub rate_limit_window_secs: u64,
    /// Interval between WebSocket pings in seconds. 0 = disabled.
    pub ping_interval_secs: u64,
    /// Whether "<name> joined" / "<name> left" notices are broadcast.
    pub system_notices: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origin: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            rate_limit_max_messages: DEFAULT_CHAT_MESSAGES_PER_WINDOW,
            rate_limit_window_secs: (DEFAULT_CHAT_WINDOW_MILLIS / 1000) as u64,
            ping_interval_secs: 30,
            system_notices: true,
        }
    }
}

impl ServerConfig {
    /// Checks that every value is within acceptable bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.max_frame_bytes == 0 {
            return Err(ConfigError::Zero {
                field: "max_frame_bytes",
            });
        }
        if self.max_frame_bytes > MAX_ALLOWED_FRAME_BYTES {
            return Err(ConfigError::TooLarge {
                field: "max_frame_bytes",
                limit: MAX_ALLOWED_FRAME_BYTES as u64,
            });
        }

        if self.rate_limit_max_messages == 0 {
            return Err(ConfigError::Zero {
                field: "rate_limit_max_messages",
            });
        }
        if self.rate_limit_window_secs == 0 {
            return Err(ConfigError::Zero {
                field: "rate_limit_window_secs",
            });
        }
        if self.rate_limit_window_secs > 3600 {
            return Err(ConfigError::TooLarge {
                field: "rate_limit_window_secs",
                limit: 3600,
            });
        }

        if self.ping_interval_secs > 3600 {
            return Err(ConfigError::TooLarge {
                field: "ping_interval_secs",
                limit: 3600,
            });
        }

        Ok(())
    }

    /// Chat rate-limit policy derived from this configuration.
    pub fn chat_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.rate_limit_max_messages,
            (self.rate_limit_window_secs as i64).saturating_mul(1000),
        )
    }

    /// The configured origin, with the wildcard normalized away.
    pub fn origin_restriction(&self) -> Option<&str> {
        self.allowed_origin
            .as_deref()
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        // テスト項目: デフォルト設定は検証を通り、16 KiB / 30 件 / 10 秒になる
        // given (前提条件):
        let config = ServerConfig::default();

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(config.max_frame_bytes, 16 * 1024);
        assert_eq!(config.chat_policy(), RateLimitPolicy::new(30, 10_000));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        // テスト項目: 0 を許さない項目は検証エラーになる
        // given (前提条件):
        let cases = [
            ServerConfig {
                max_frame_bytes: 0,
                ..Default::default()
            },
            ServerConfig {
                rate_limit_max_messages: 0,
                ..Default::default()
            },
            ServerConfig {
                rate_limit_window_secs: 0,
                ..Default::default()
            },
        ];

        // when (操作) / then (期待する結果):
        for config in cases {
            assert!(matches!(config.validate(), Err(ConfigError::Zero { .. })));
        }
    }

    #[test]
    fn test_ping_interval_zero_disables_ping() {
        // テスト項目: ping 間隔 0 は無効化として許可される
        let config = ServerConfig {
            ping_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_oversized_frame_limit_is_rejected() {
        // テスト項目: 過大なフレーム上限は検証エラーになる
        // given (前提条件):
        let config = ServerConfig {
            max_frame_bytes: MAX_ALLOWED_FRAME_BYTES + 1,
            ..Default::default()
        };

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConfigError::TooLarge {
                field: "max_frame_bytes",
                limit: MAX_ALLOWED_FRAME_BYTES as u64,
            })
        );
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let config = ServerConfig {
            host: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn test_wildcard_origin_means_unrestricted() {
        // テスト項目: "*" と空文字は制限なしとして扱われる
        for origin in [None, Some("*"), Some("")] {
            let config = ServerConfig {
                allowed_origin: origin.map(str::to_string),
                ..Default::default()
            };
            assert_eq!(config.origin_restriction(), None);
        }

        let config = ServerConfig {
            allowed_origin: Some("https://chat.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.origin_restriction(),
            Some("https://chat.example.com")
        );
    }
}
