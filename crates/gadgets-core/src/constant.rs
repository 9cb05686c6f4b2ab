//! Folded integral constants cast to a target primitive type.

use std::fmt;

/// An integral constant after a narrowing or widening cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `char`
    Char(u16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
}

impl Constant {
    /// Casts a folded value to the named primitive type with two's-complement
    /// truncation. Returns `None` for non-integral types.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cast(value: i64, ty: &str) -> Option<Self> {
        match ty {
            "byte" | "java.lang.Byte" => Some(Self::Byte(value as i8)),
            "short" | "java.lang.Short" => Some(Self::Short(value as i16)),
            "char" | "java.lang.Character" => Some(Self::Char(value as u16)),
            "int" | "java.lang.Integer" => Some(Self::Int(value as i32)),
            "long" | "java.lang.Long" => Some(Self::Long(value)),
            _ => None,
        }
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Byte(v) => v == 0,
            Self::Short(v) => v == 0,
            Self::Char(v) => v == 0,
            Self::Int(v) => v == 0,
            Self::Long(v) => v == 0,
        }
    }

    /// Returns true if every bit of the type is set.
    #[must_use]
    pub fn is_all_ones(self) -> bool {
        match self {
            Self::Byte(v) => v == -1,
            Self::Short(v) => v == -1,
            Self::Char(v) => v == u16::MAX,
            Self::Int(v) => v == -1,
            Self::Long(v) => v == -1,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
        }
    }
}
