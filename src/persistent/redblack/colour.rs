//! Node colours and their blackness arithmetic.

use std::fmt;
use std::ops::{Add, Sub};

/// The colour of an edge in a red-black tree.
///
/// Besides the usual `Red` and `Black`, deletion temporarily uses
/// `DoubleBlack` (one black level too many) and `NegativeBlack` (one too
/// few). Colours add and subtract as "blackness" levels modulo 4, with
/// `Red = 0`, `Black = 1`, `DoubleBlack = 2` and `NegativeBlack = -1`.
///
/// The discriminant is the 2-bit tag stored in the pointer. It is offset so
/// that a zero tag reads as `Black`, which makes an untagged null pointer a
/// black external leaf.
///
/// # Examples
///
/// ```rust
/// use persistent_fds::persistent::Colour;
///
/// assert_eq!(Colour::Red + Colour::Black, Colour::Black);
/// assert_eq!(Colour::Black + Colour::Black, Colour::DoubleBlack);
/// assert_eq!(Colour::Red - Colour::Black, Colour::NegativeBlack);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Colour {
    /// An ordinary black edge.
    #[default]
    Black = 0,
    /// A black edge carrying an extra black level, produced by deletion.
    DoubleBlack = 1,
    /// An edge one black level below red, produced by deletion.
    NegativeBlack = 2,
    /// An ordinary red edge.
    Red = 3,
}

impl Colour {
    /// Decodes a pointer tag. Only the low two bits are read.
    #[inline]
    #[must_use]
    pub const fn from_tag(tag: usize) -> Self {
        match tag & 0b11 {
            0 => Self::Black,
            1 => Self::DoubleBlack,
            2 => Self::NegativeBlack,
            _ => Self::Red,
        }
    }

    /// Returns the pointer tag encoding this colour.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> usize {
        self as usize
    }

    /// Blackness level modulo 4 (`Red = 0` ... `NegativeBlack = 3`).
    const fn blackness(self) -> usize {
        (self as usize + 1) % 4
    }

    const fn from_blackness(blackness: usize) -> Self {
        Self::from_tag((blackness + 3) % 4)
    }

    /// Returns this colour with one more black level.
    #[inline]
    #[must_use]
    pub const fn blacker(self) -> Self {
        Self::from_blackness(self.blackness() + 1)
    }

    /// Returns this colour with one black level less.
    #[inline]
    #[must_use]
    pub const fn redder(self) -> Self {
        Self::from_blackness(self.blackness() + 3)
    }

    /// Returns `true` for [`Colour::Red`].
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` for [`Colour::Black`].
    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        matches!(self, Self::Black)
    }
}

impl Add for Colour {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::from_blackness(self.blackness() + other.blackness())
    }
}

impl Sub for Colour {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::from_blackness(self.blackness() + 4 - other.blackness())
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Black => "black",
            Self::DoubleBlack => "double black",
            Self::NegativeBlack => "negative black",
            Self::Red => "red",
        };
        formatter.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Colour::Red, Colour::Black, Colour::Black)]
    #[case(Colour::NegativeBlack, Colour::Black, Colour::Red)]
    #[case(Colour::Black, Colour::Black, Colour::DoubleBlack)]
    #[case(Colour::Red, Colour::Red, Colour::Red)]
    fn test_addition(#[case] left: Colour, #[case] right: Colour, #[case] expected: Colour) {
        assert_eq!(left + right, expected);
    }

    #[rstest]
    #[case(Colour::Red, Colour::Black, Colour::NegativeBlack)]
    #[case(Colour::Black, Colour::Black, Colour::Red)]
    #[case(Colour::DoubleBlack, Colour::Black, Colour::Black)]
    fn test_subtraction(#[case] left: Colour, #[case] right: Colour, #[case] expected: Colour) {
        assert_eq!(left - right, expected);
    }

    #[rstest]
    #[case(Colour::Black)]
    #[case(Colour::DoubleBlack)]
    #[case(Colour::NegativeBlack)]
    #[case(Colour::Red)]
    fn test_tag_round_trip(#[case] colour: Colour) {
        assert_eq!(Colour::from_tag(colour.tag()), colour);
        assert!(colour.tag() < 4);
    }

    #[rstest]
    fn test_zero_tag_is_black() {
        assert_eq!(Colour::from_tag(0), Colour::Black);
        assert_eq!(Colour::default(), Colour::Black);
    }

    #[rstest]
    fn test_blacker_and_redder_are_inverse() {
        for colour in [
            Colour::Black,
            Colour::DoubleBlack,
            Colour::NegativeBlack,
            Colour::Red,
        ] {
            assert_eq!(colour.blacker().redder(), colour);
            assert_eq!(colour.blacker(), colour + Colour::Black);
            assert_eq!(colour.redder(), colour - Colour::Black);
        }
    }
}
