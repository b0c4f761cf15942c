//! Sink identifier type
//!
//! `SinkId` is the position of a sink in the dense list the routing table
//! creates. Only the sinks a configuration needs exist, so ids are assigned
//! sequentially and the general sink is always id 0.

use std::fmt;

/// Index of a sink in the logger's sink list
///
/// `Copy` and one byte: routing returns it by value on every log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u8);

impl SinkId {
    /// The catch-all sink, present in every table
    pub const GENERAL: SinkId = SinkId(0);

    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Get the index as usize (for slice indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink:{}", self.0)
    }
}

impl From<u8> for SinkId {
    #[inline]
    fn from(index: u8) -> Self {
        Self::new(index)
    }
}

impl From<SinkId> for usize {
    #[inline]
    fn from(id: SinkId) -> Self {
        id.as_usize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_is_zero() {
        assert_eq!(SinkId::GENERAL.index(), 0);
        assert_eq!(SinkId::GENERAL, SinkId::new(0));
    }

    #[test]
    fn test_ordering() {
        assert!(SinkId::new(1) < SinkId::new(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(SinkId::new(3).to_string(), "sink:3");
    }

    #[test]
    fn test_conversions() {
        let id: SinkId = 4u8.into();
        let index: usize = id.into();
        assert_eq!(index, 4);
    }

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<SinkId>(), 1);
        assert_eq!(std::mem::size_of::<Option<SinkId>>(), 2);
    }

    #[test]
    fn test_slice_indexing() {
        let sinks = ["general", "request", "debug"];
        assert_eq!(sinks[SinkId::new(1).as_usize()], "request");
    }
}
