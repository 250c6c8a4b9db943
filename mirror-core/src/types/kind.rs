use core::fmt;

use super::NumericType;

/// The coarse category of a shape.
///
/// Two values of different types can share a kind (`String` and `&str`, or a
/// newtype and the type it wraps); positional binding only requires kinds to
/// agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// `()`
    Unit,
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`, `&str`
    String,
    /// Structs, named or tuple-like
    Struct,
    /// Tuples with at least one element
    Tuple,
    /// `Vec<T>`
    List,
    /// `Option<T>`
    Option,
    /// References and `Box<T>`
    Pointer,
    /// Function pointers
    Function,
    /// Anything else
    Opaque,
}

impl Kind {
    pub(crate) fn numeric(numeric: NumericType, size: usize) -> Kind {
        match numeric {
            NumericType::Integer {
                signed: true,
                pointer_sized: true,
            } => Kind::Isize,
            NumericType::Integer {
                signed: false,
                pointer_sized: true,
            } => Kind::Usize,
            NumericType::Integer { signed: true, .. } => match size {
                1 => Kind::I8,
                2 => Kind::I16,
                4 => Kind::I32,
                8 => Kind::I64,
                16 => Kind::I128,
                _ => Kind::Opaque,
            },
            NumericType::Integer { signed: false, .. } => match size {
                1 => Kind::U8,
                2 => Kind::U16,
                4 => Kind::U32,
                8 => Kind::U64,
                16 => Kind::U128,
                _ => Kind::Opaque,
            },
            NumericType::Float => match size {
                4 => Kind::F32,
                8 => Kind::F64,
                _ => Kind::Opaque,
            },
        }
    }

    /// Lowercase name, as used in error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Unit => "unit",
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::I128 => "i128",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::U128 => "u128",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::Tuple => "tuple",
            Kind::List => "list",
            Kind::Option => "option",
            Kind::Pointer => "pointer",
            Kind::Function => "function",
            Kind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
