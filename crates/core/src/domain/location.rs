// Location vocabulary
//
// Loaded once from configuration at startup and never mutated afterwards.

use crate::domain::error::{DomainError, Result};
use serde::Serialize;

/// A location that has been checked against the configured set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location(String);

impl Location {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed set of recognised locations, in configured order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSet {
    ordered: Vec<String>,
}

impl LocationSet {
    /// Build the set, trimming entries and dropping duplicates (first one wins)
    pub fn new<I, S>(locations: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for raw in locations {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(DomainError::ValidationError(
                    "location names cannot be empty".to_string(),
                ));
            }
            if !ordered.iter().any(|existing| existing == name) {
                ordered.push(name.to_string());
            }
        }

        if ordered.is_empty() {
            return Err(DomainError::ValidationError(
                "at least one location must be configured".to_string(),
            ));
        }

        Ok(Self { ordered })
    }

    /// Exact (case-sensitive) lookup after trimming surrounding whitespace
    pub fn resolve(&self, raw: &str) -> Result<Location> {
        let name = raw.trim();
        if self.contains(name) {
            Ok(Location(name.to_string()))
        } else {
            Err(DomainError::UnknownLocation(raw.to_string()))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ordered.iter().any(|l| l == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_configured_order_and_dedups() {
        let set = LocationSet::new(["north", " south ", "north", "east"]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["north", "south", "east"]);
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn test_rejects_empty_configuration() {
        assert!(LocationSet::new(Vec::<String>::new()).is_err());
        assert!(LocationSet::new(["north", "  "]).is_err());
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let set = LocationSet::new(["north"]).unwrap();
        assert_eq!(set.resolve(" north").unwrap().as_str(), "north");
        assert_eq!(
            set.resolve("North").unwrap_err(),
            DomainError::UnknownLocation("North".to_string())
        );
    }
}
