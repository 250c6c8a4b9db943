use super::Field;

/// Describes built-in sequence types
#[derive(Clone, Copy, Debug)]
pub enum SequenceType {
    /// Tuple (`(T0, T1, ...)`), including the unit type `()`
    Tuple(TupleType),
}

/// Element layout of a tuple
#[derive(Clone, Copy, Debug)]
pub struct TupleType {
    /// Elements in order, named `0`, `1`, ...
    pub fields: &'static [Field],
}
