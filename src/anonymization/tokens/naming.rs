//! Token naming scheme
//!
//! The replacement label of a rule decides how its tokens look:
//!
//! | label                     | 1st token           | 2nd token           |
//! |---------------------------|---------------------|---------------------|
//! | `ip`                      | `IP_1`              | `IP_2`              |
//! | `email`                   | `USER_A@domain.tld` | `USER_B@domain.tld` |
//! | `api-key`                 | `API_KEY_v1`        | `API_KEY_v2`        |
//! | `uuid`, `secret`, ...     | `UUID_1`            | `UUID_2`            |
//! | `HOST_{index}`            | `HOST_1`            | `HOST_2`            |
//! | `lxcHost` (custom)        | `lxcHost`           | `lxcHost_2`         |

use crate::domain::INDEX_PLACEHOLDER;

/// Token kinds with a dedicated naming scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ip,
    Email,
    Uuid,
    Secret,
    ApiKey,
    Path,
    Jwt,
    PrivateKey,
}

impl TokenKind {
    /// Parse a replacement label into a known kind (case-insensitive)
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "ip" => Some(Self::Ip),
            "email" => Some(Self::Email),
            "uuid" => Some(Self::Uuid),
            "secret" => Some(Self::Secret),
            "api-key" | "api_key" | "apikey" => Some(Self::ApiKey),
            "path" => Some(Self::Path),
            "jwt" => Some(Self::Jwt),
            "private-key" | "private_key" => Some(Self::PrivateKey),
            _ => None,
        }
    }

    /// Upper-case prefix used by the generic `{PREFIX}_{n}` scheme
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Email => "USER",
            Self::Uuid => "UUID",
            Self::Secret => "SECRET",
            Self::ApiKey => "API_KEY",
            Self::Path => "PATH",
            Self::Jwt => "JWT",
            Self::PrivateKey => "PRIVATE_KEY",
        }
    }

    /// Canonical counter key for this kind
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::Secret => "secret",
            Self::ApiKey => "api-key",
            Self::Path => "path",
            Self::Jwt => "jwt",
            Self::PrivateKey => "private-key",
        }
    }
}

/// Counter key for a replacement label
///
/// Known kinds share one counter regardless of label spelling; every other
/// label counts on its own.
pub fn counter_key(label: &str) -> String {
    match TokenKind::parse(label) {
        Some(kind) if !label.contains(INDEX_PLACEHOLDER) => kind.key().to_string(),
        _ => label.trim().to_string(),
    }
}

/// Format the `index`-th token (1-based) for a replacement label
pub fn format_token(label: &str, index: u64) -> String {
    let label = label.trim();

    if label.contains(INDEX_PLACEHOLDER) {
        return label.replace(INDEX_PLACEHOLDER, &index.to_string());
    }

    match TokenKind::parse(label) {
        Some(TokenKind::Email) => format!("USER_{}@domain.tld", alpha_index(index)),
        Some(TokenKind::ApiKey) => format!("API_KEY_v{index}"),
        Some(kind) => format!("{}_{index}", kind.prefix()),
        None if index <= 1 => label.to_string(),
        None => format!("{label}_{index}"),
    }
}

/// Bijective base-26 letters: 1 → A, 26 → Z, 27 → AA
fn alpha_index(mut index: u64) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        index -= 1;
        letters.push(b'A' + (index % 26) as u8);
        index /= 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
