use super::*;

mod field;
pub use field::*;

mod struct_;
pub use struct_::*;

mod primitive;
pub use primitive::*;

mod sequence;
pub use sequence::*;

mod user;
pub use user::*;

mod pointer;
pub use pointer::*;

/// The definition of a shape in accordance to rust reference:
///
/// See <https://doc.rust-lang.org/reference/types.html>
#[derive(Clone, Copy, Debug)]
pub enum Type {
    /// Built-in primitive.
    Primitive(PrimitiveType),
    /// Sequence (tuple).
    Sequence(SequenceType),
    /// User-defined type (struct, or opaque).
    User(UserType),
    /// Pointer type (reference, function pointer).
    Pointer(PointerType),
}
