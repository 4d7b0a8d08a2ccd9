use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Stamp identifying a layer on the map for the lifetime of the process.
/// Assigned once when a layer is created and never reused, so the map engine
/// can keep its own handle table keyed by it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(u32);

impl LayerId {
    /// Hand out the next unused stamp.
    pub fn next() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(1);
        LayerId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a stamp received back from the map engine.
    pub const fn from_raw(raw: u32) -> Self {
        LayerId(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_unique() {
        let a = LayerId::next();
        let b = LayerId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn raw_roundtrip() {
        let id = LayerId::from_raw(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "#42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }
}
