//! Selection endpoints

use serde::{Deserialize, Serialize};

/// A caret position: a node and a char offset into its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Position<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Last known selection; either endpoint may be unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<N> {
    pub start: Option<Position<N>>,
    pub end: Option<Position<N>>,
}

impl<N> Default for Range<N> {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

impl<N> Range<N> {
    /// Both endpoints are known
    pub fn is_live(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Which endpoints of a range a query applies to
///
/// Bit 0 is the start, bit 1 the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EndpointMask(u8);

impl EndpointMask {
    pub const NONE: Self = Self(0);
    pub const START: Self = Self(0b01);
    pub const END: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    pub fn from_flags(start: bool, end: bool) -> Self {
        Self(u8::from(start) | (u8::from(end) << 1))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has_start(self) -> bool {
        self.0 & Self::START.0 != 0
    }

    pub fn has_end(self) -> bool {
        self.0 & Self::END.0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_bits() {
        assert_eq!(EndpointMask::from_flags(false, false), EndpointMask::NONE);
        assert_eq!(EndpointMask::from_flags(true, false).bits(), 1);
        assert_eq!(EndpointMask::from_flags(false, true).bits(), 2);
        assert_eq!(EndpointMask::from_flags(true, true), EndpointMask::BOTH);
        assert!(EndpointMask::BOTH.has_start() && EndpointMask::BOTH.has_end());
    }

    #[test]
    fn test_default_range_is_absent() {
        let range: Range<u32> = Range::default();
        assert!(!range.is_live());
    }
}
