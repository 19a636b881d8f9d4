use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a field polygon, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(u64);

impl PolygonId {
    /// Wrap a raw integer id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the underlying integer.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is used up.
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for PolygonId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_next_increments() {
        let id = PolygonId::new(7);
        assert_eq!(id.checked_next(), Some(PolygonId::new(8)));
    }

    #[test]
    fn test_checked_next_at_max() {
        assert_eq!(PolygonId::new(u64::MAX).checked_next(), None);
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(PolygonId::from(9), PolygonId::new(9));
    }

    #[test]
    fn test_id_serializes_as_number() {
        let id = PolygonId::new(3);
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "3");
        let parsed: PolygonId = serde_json::from_str("42").expect("deserialize");
        assert_eq!(parsed.get(), 42);
    }
}
