use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryParseError {
    #[error("entry '{0}' is not of the form name=url")]
    MalformedEntry(String),

    #[error("service '{0}' is listed more than once")]
    Duplicate(String),
}

/// Maps a resource name to the fallback address used when it is revalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    entries: BTreeMap<String, String>,
}

impl ServiceRegistry {
    pub fn fallback_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromStr for ServiceRegistry {
    type Err = RegistryParseError;

    /// Parses `name=url,name=url`. Names are lowercased; blank segments are skipped.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut entries = BTreeMap::new();

        for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, url) = segment
                .split_once('=')
                .map(|(n, u)| (n.trim().to_lowercase(), u.trim()))
                .filter(|(n, u)| !n.is_empty() && !u.is_empty())
                .ok_or_else(|| RegistryParseError::MalformedEntry(segment.to_string()))?;

            if entries.insert(name.clone(), url.to_string()).is_some() {
                return Err(RegistryParseError::Duplicate(name));
            }
        }

        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_single_entry() {
        let registry: ServiceRegistry = "pollinations=https://text.pollinations.ai".parse().unwrap();
        assert_eq!(
            registry.fallback_for("pollinations"),
            Some("https://text.pollinations.ai")
        );
        assert_eq!(registry.fallback_for("openai"), None);
    }

    #[test]
    fn test_parses_multiple_entries_and_normalizes_names() {
        let registry: ServiceRegistry = " Pollinations = https://a.example , other=https://b.example,"
            .parse()
            .unwrap();
        assert_eq!(registry.fallback_for("pollinations"), Some("https://a.example"));
        assert_eq!(registry.fallback_for("other"), Some("https://b.example"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["other", "pollinations"]);
    }

    #[test]
    fn test_url_may_contain_equals_sign() {
        let registry: ServiceRegistry = "svc=https://x.example/?a=b".parse().unwrap();
        assert_eq!(registry.fallback_for("svc"), Some("https://x.example/?a=b"));
    }

    #[test]
    fn test_rejects_entry_without_url() {
        let err = "pollinations".parse::<ServiceRegistry>().unwrap_err();
        assert_eq!(err, RegistryParseError::MalformedEntry("pollinations".to_string()));

        let err = "pollinations=".parse::<ServiceRegistry>().unwrap_err();
        assert!(matches!(err, RegistryParseError::MalformedEntry(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = "a=https://1.example,A=https://2.example"
            .parse::<ServiceRegistry>()
            .unwrap_err();
        assert_eq!(err, RegistryParseError::Duplicate("a".to_string()));
    }

    #[test]
    fn test_empty_string_is_empty_registry() {
        let registry: ServiceRegistry = "".parse().unwrap();
        assert_eq!(registry.names().count(), 0);
    }
}
