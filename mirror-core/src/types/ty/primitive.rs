/// Describes built-in primitives (u32, bool, str, etc.)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Boolean (`bool`)
    Boolean,
    /// Numeric (integer/float)
    Numeric(NumericType),
    /// Textual (`char`/`str`)
    Textual(TextualType),
}

/// Describes numeric types (integer/float)
///
/// The number of bits can be found by checking the size of the shape's layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericType {
    /// Integer (`u16`, `i8`, `usize`, etc.)
    Integer {
        /// Is this a signed integer (`i`) or unsigned (`u`)?
        signed: bool,
        /// `isize`/`usize`, which share a layout with one of the fixed widths
        pointer_sized: bool,
    },
    /// Floating-point (`f32`, `f64`)
    Float,
}

/// Describes textual types (char/string)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextualType {
    /// Unicode scalar value (`char`)
    Char,
    /// UTF-8 string (`str`)
    Str,
}
