use super::StructType;

/// User-defined types
#[derive(Clone, Copy, Debug)]
pub enum UserType {
    /// Describes a `struct`
    Struct(StructType),
    /// A type whose insides are not described (`String`, `Vec<T>`, `Box<T>`...).
    ///
    /// Check the shape's [`crate::Def`] for what can be done with it.
    Opaque,
}
