use crate::{PtrMut, PtrUninit};

use super::Shape;

/// A method exposed for invocation by name
#[derive(Clone, Copy, Debug)]
pub struct MethodDef {
    /// The method's name, as written in its declaration
    pub name: &'static str,

    /// How the method borrows its receiver
    pub receiver: Receiver,

    /// Parameter types in declaration order, receiver excluded
    pub parameters: &'static [fn() -> &'static Shape],

    /// The return type
    pub return_type: fn() -> &'static Shape,

    /// Calls the method
    pub call: MethodCallFn,
}

impl MethodDef {
    /// Number of declared parameters, receiver excluded
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the shape of the return type
    pub fn return_shape(&self) -> &'static Shape {
        (self.return_type)()
    }
}

/// How a method borrows `self`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
}

/// Calls a method on the value at `receiver` with the values in `args`,
/// writing the return value into `out`.
///
/// # Safety
///
/// - `receiver` must point to an initialized value of the shape the method
///   was found on, writable if the method takes `&mut self`
/// - `args` must hold exactly one initialized value per declared parameter, of
///   exactly the parameter's type. They are moved out: the caller must free
///   their storage without dropping them.
/// - `out` must be valid for writes of the return type.
pub type MethodCallFn = for<'mem> unsafe fn(
    receiver: PtrMut<'mem>,
    args: &[PtrMut<'mem>],
    out: PtrUninit<'mem>,
) -> PtrMut<'mem>;
