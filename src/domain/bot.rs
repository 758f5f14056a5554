//! Bot registry types.
//!
//! The registry maps a lowercase bot identifier to the HTTP endpoint and
//! display metadata of a remote bot service. It is loaded once at startup
//! and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::DomainError;

/// Lowercase bot identifier used as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BotKey(String);

impl BotKey {
    /// Parse a bot key, normalizing to lowercase.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidBotKey`] for empty keys or keys containing
    /// whitespace.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidBotKey(raw.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote bot operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAction {
    Start,
    Stop,
    Statuses,
}

impl BotAction {
    /// Path segment appended to the bot endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Statuses => "statuses",
        }
    }

    /// Whether the action only reads remote state.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Statuses)
    }
}

impl fmt::Display for BotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Static registry entry for one bot service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BotConfigEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub endpoint: Url,
}

impl BotConfigEntry {
    /// Full URL for an action: `{endpoint}/{action}`.
    #[must_use]
    pub fn action_url(&self, action: BotAction) -> String {
        format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            action.path()
        )
    }
}

/// Immutable mapping of bot keys to their configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotRegistry {
    bots: BTreeMap<BotKey, BotConfigEntry>,
}

impl BotRegistry {
    /// Build a registry from already-parsed entries.
    ///
    /// # Errors
    /// Returns the offending key when it is invalid or collides with another
    /// key after lowercasing.
    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (String, BotConfigEntry)>,
    {
        let mut bots = BTreeMap::new();
        for (raw, entry) in entries {
            let key = BotKey::parse(&raw).map_err(RegistryError::Key)?;
            if bots.insert(key.clone(), entry).is_some() {
                return Err(RegistryError::Duplicate(key.to_string()));
            }
        }
        Ok(Self { bots })
    }

    /// Parse the JSON registry format `{ "<key>": { name, description, endpoint } }`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Json`] for malformed documents, otherwise as
    /// [`BotRegistry::from_entries`].
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let RawEntries(raw) =
            serde_json::from_str(json).map_err(|e| RegistryError::Json(e.to_string()))?;
        let entries: Vec<(String, BotConfigEntry)> = raw
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map(|entry| (key.clone(), entry))
                    .map_err(|e| RegistryError::Json(format!("bot '{key}': {e}")))
            })
            .collect::<Result<_, _>>()?;
        Self::from_entries(entries)
    }

    /// Resolve a bot key case-insensitively.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<(&BotKey, &BotConfigEntry)> {
        let key = BotKey::parse(raw).ok()?;
        self.bots.get_key_value(&key)
    }

    /// Look up an already-normalized key.
    #[must_use]
    pub fn get(&self, key: &BotKey) -> Option<&BotConfigEntry> {
        self.bots.get(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BotKey, &BotConfigEntry)> {
        self.bots.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

/// Registry document entries in file order, repeated keys included.
struct RawEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> serde::de::Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of bot entries")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Reasons a registry cannot be assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Key(DomainError),

    #[error("duplicate bot key '{0}'")]
    Duplicate(String),

    #[error("malformed registry: {0}")]
    Json(String),
}
