use crate::{PtrConst, PtrMut, PtrUninit};

use super::Shape;

/// Describes all pointer types
#[derive(Clone, Copy, Debug)]
pub enum PointerType {
    /// Describes bound const and mut references (`&`/`&mut`)
    Reference(ValuePointerType),
    /// Describes function pointers
    Function(FunctionPointerDef),
}

/// Describes a reference
#[derive(Clone, Copy, Debug)]
pub struct ValuePointerType {
    /// Is the pointer mutable or not.
    pub mutable: bool,
    /// Describes whether the pointer is wider or not
    ///
    /// Note: if the pointer is wide, then the `target` shape will have `ShapeLayout::Unsized`, and
    /// the vtables of the target shape will expect the pointer to _this_ pointer, rather than the
    /// resulting address of unsized data.
    pub wide: bool,
    /// Shape of the pointer's pointee
    ///
    /// This needs to be indirect (behind a function), in order to allow recursive types without
    /// overflowing the const-eval system.
    pub target: fn() -> &'static Shape,
}

/// Signature and call primitive of a function pointer type
#[derive(Clone, Copy, Debug)]
pub struct FunctionPointerDef {
    /// All parameter types, in declaration order
    pub parameters: &'static [fn() -> &'static Shape],

    /// The return type
    pub return_type: fn() -> &'static Shape,

    /// Calls the function pointer stored at `func`
    pub call: CallFn,
}

impl FunctionPointerDef {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the shape of the return type
    pub fn return_shape(&self) -> &'static Shape {
        (self.return_type)()
    }
}

/// Calls the function pointer stored at `func` with the values in `args`,
/// writing the return value into `out`.
///
/// # Safety
///
/// - `func` must point to a value of the function pointer type this was taken from
/// - `args` must hold exactly one initialized value per declared parameter, of
///   exactly the parameter's type. They are moved out: the caller must free
///   their storage without dropping them.
/// - `out` must be valid for writes of the return type.
pub type CallFn = for<'mem> unsafe fn(
    func: PtrConst<'mem>,
    args: &[PtrMut<'mem>],
    out: PtrUninit<'mem>,
) -> PtrMut<'mem>;

/// Keeps a list of shape getters typed as such, including when it is empty.
pub const fn shape_fns<const N: usize>(
    shapes: [fn() -> &'static Shape; N],
) -> [fn() -> &'static Shape; N] {
    shapes
}
