//! Scalar payload of a datum cell
//!
//! One sum type stands in for the whole family of scalar overloads:
//! every insert/replace/compare entry point takes a [`Datum`] (or
//! something convertible into one).

use std::fmt;

/// Scalar value carried by a datum cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Datum {
    /// Boolean
    Bool(bool),

    /// Character
    Char(char),

    /// Unsigned byte
    UChar(u8),

    /// Signed integer
    Long(i64),

    /// Unsigned integer
    ULong(u64),

    /// Floating point
    Double(f64),

    /// Owned string
    Str(String),

    /// Opaque user token (never dereferenced by the library)
    Ptr(usize),
}

impl Datum {
    /// Integer or floating point payload
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Datum::UChar(_) | Datum::Long(_) | Datum::ULong(_) | Datum::Double(_)
        )
    }

    /// User pointer payload
    pub fn is_ptr(&self) -> bool {
        matches!(self, Datum::Ptr(_))
    }

    /// String payload
    pub fn is_string(&self) -> bool {
        matches!(self, Datum::Str(_))
    }

    /// Name of the scalar subtype, as used in dumps
    pub fn type_name(&self) -> &'static str {
        match self {
            Datum::Bool(_) => "bool",
            Datum::Char(_) => "char",
            Datum::UChar(_) => "uchar",
            Datum::Long(_) => "long",
            Datum::ULong(_) => "ulong",
            Datum::Double(_) => "double",
            Datum::Str(_) => "string",
            Datum::Ptr(_) => "ptr",
        }
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Datum::UChar(v) => Some(v as f64),
            Datum::Long(v) => Some(v as f64),
            Datum::ULong(v) => Some(v as f64),
            Datum::Double(v) => Some(v),
            _ => None,
        }
    }
}

/// Text form used by the list writer. Re-reading it yields an equal datum.
impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::Char(c) => match c {
                '\'' => f.write_str("'\\''"),
                '\\' => f.write_str("'\\\\'"),
                '\n' => f.write_str("'\\n'"),
                '\t' => f.write_str("'\\t'"),
                c => write!(f, "'{}'", c),
            },
            Datum::UChar(v) => write!(f, "{}uc", v),
            Datum::Long(v) => write!(f, "{}", v),
            Datum::ULong(v) => write!(f, "{}u", v),
            Datum::Double(v) => {
                if v.is_nan() {
                    f.write_str("+nan.0")
                } else if v.is_infinite() {
                    f.write_str(if *v > 0.0 { "+inf.0" } else { "-inf.0" })
                } else if v.fract() == 0.0 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Datum::Str(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Datum::Ptr(p) => write!(f, "@{:#x}", p),
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<char> for Datum {
    fn from(v: char) -> Self {
        Datum::Char(v)
    }
}

impl From<u8> for Datum {
    fn from(v: u8) -> Self {
        Datum::UChar(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Long(v as i64)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Long(v)
    }
}

impl From<u64> for Datum {
    fn from(v: u64) -> Self {
        Datum::ULong(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Double(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Str(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Str(v)
    }
}
