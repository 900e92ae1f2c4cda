/// Which side of the board a castling move brings the king toward.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CastleRight {
    Short,
    Long,
}

/// A set of castling rights for one color: a subset of {Short, Long}.
/// Stored as a 2-bit mask, same convention as the teacher's 4-bit
/// whole-position `castling: u8` field (bit 0 = kingside, bit 1 = queenside),
/// just split one color at a time since Position keeps one stack per color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct CastleRights(u8);

const SHORT_BIT: u8 = 1;
const LONG_BIT: u8 = 2;

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const BOTH: CastleRights = CastleRights(SHORT_BIT | LONG_BIT);

    #[inline]
    pub fn contains(self, right: CastleRight) -> bool {
        self.0 & bit(right) != 0
    }

    #[inline]
    pub fn with(self, right: CastleRight) -> CastleRights {
        CastleRights(self.0 | bit(right))
    }

    #[inline]
    pub fn without(self, right: CastleRight) -> CastleRights {
        CastleRights(self.0 & !bit(right))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

#[inline]
fn bit(right: CastleRight) -> u8 {
    match right {
        CastleRight::Short => SHORT_BIT,
        CastleRight::Long => LONG_BIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_contains_nothing() {
        assert!(!CastleRights::NONE.contains(CastleRight::Short));
        assert!(!CastleRights::NONE.contains(CastleRight::Long));
    }

    #[test]
    fn test_with_without() {
        let r = CastleRights::NONE.with(CastleRight::Short);
        assert!(r.contains(CastleRight::Short));
        assert!(!r.contains(CastleRight::Long));
        let r = r.without(CastleRight::Short);
        assert!(r.is_empty());
    }

    #[test]
    fn test_both() {
        assert!(CastleRights::BOTH.contains(CastleRight::Short));
        assert!(CastleRights::BOTH.contains(CastleRight::Long));
    }
}

// Castling rights modeled per-color so Position can keep one history stack per
// color, per spec: "two stacks (one per color), each top element is a subset
// of {Short, Long}".
