use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::channel::ChannelKind;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("hardcoded regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("hardcoded regex"));
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z0-9_]{3,32}$").expect("hardcoded regex"));

#[derive(Debug, Error, PartialEq)]
pub enum DestinationError {
    #[error("Destination is not valid for channel {0}")]
    InvalidForChannel(ChannelKind),
}

/// A delivery endpoint validated for its channel. The raw value is only ever
/// used for dispatch; every observable surface gets [`Destination::masked`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Email(String),
    Phone(String),
    Handle(String),
}

impl Destination {
    pub fn parse(channel: ChannelKind, raw: &str) -> Result<Self, DestinationError> {
        let raw = raw.trim();
        match channel {
            ChannelKind::Email => {
                let normalized = raw.to_lowercase();
                if EMAIL_RE.is_match(&normalized) {
                    Ok(Self::Email(normalized))
                } else {
                    Err(DestinationError::InvalidForChannel(channel))
                }
            }
            ChannelKind::Sms | ChannelKind::Whatsapp | ChannelKind::Voice => {
                if PHONE_RE.is_match(raw) {
                    Ok(Self::Phone(raw.to_string()))
                } else {
                    Err(DestinationError::InvalidForChannel(channel))
                }
            }
            // Telegram reaches either a handle or a phone-backed account.
            ChannelKind::Telegram => {
                if PHONE_RE.is_match(raw) {
                    Ok(Self::Phone(raw.to_string()))
                } else if HANDLE_RE.is_match(raw) {
                    Ok(Self::Handle(raw.to_string()))
                } else {
                    Err(DestinationError::InvalidForChannel(channel))
                }
            }
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Email(value) | Self::Phone(value) | Self::Handle(value) => value,
        }
    }

    /// Redacted rendering for responses, logs, and security events.
    pub fn masked(&self) -> String {
        match self {
            Self::Email(addr) => mask_email(addr),
            Self::Phone(number) => mask_phone(number),
            Self::Handle(handle) => mask_handle(handle),
        }
    }
}

fn mask_email(addr: &str) -> String {
    match addr.split_once('@') {
        Some((local, domain)) => {
            let keep: String = local.chars().take(2).collect();
            format!("{keep}***@{domain}")
        }
        None => "***".to_string(),
    }
}

// Validated phone numbers are ASCII, so byte slicing is safe here.
fn mask_phone(number: &str) -> String {
    if number.len() >= 8 {
        let head = &number[..2];
        let tail = &number[number.len() - 4..];
        format!("{head}***{tail}")
    } else if number.len() >= 4 {
        format!("***{}", &number[number.len() - 2..])
    } else {
        "***".to_string()
    }
}

fn mask_handle(handle: &str) -> String {
    let bare = handle.strip_prefix('@').unwrap_or(handle);
    let keep: String = bare.chars().take(2).collect();
    format!("@{keep}***")
}
