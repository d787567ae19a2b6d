//! Ordered label scales used by traits and augments

use std::fmt;
use std::str::FromStr;

/// Trait power tier, `D < C < B < A < S`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerTier {
    D,
    C,
    B,
    A,
    S,
}

/// Augment tier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AugmentTier {
    C,
    B,
    A,
    S,
}

/// Augment rarity, `Silver < Gold < Prismatic`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Silver,
    Gold,
    Prismatic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub scale: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.scale, self.value)
    }
}

impl std::error::Error for UnknownLabel {}

macro_rules! label_scale {
    ($ty:ident, $scale:expr, [$($variant:ident => $label:expr),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownLabel {
                        scale: $scale,
                        value: s.to_string(),
                    })
            }
        }
    };
}

label_scale!(PowerTier, "power tier", [D => "D", C => "C", B => "B", A => "A", S => "S"]);
label_scale!(AugmentTier, "augment tier", [C => "C", B => "B", A => "A", S => "S"]);
label_scale!(Rarity, "rarity", [Silver => "Silver", Gold => "Gold", Prismatic => "Prismatic"]);
