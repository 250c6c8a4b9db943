use crate::ptr::{PtrConst, PtrMut, PtrUninit};
use core::{fmt, marker::PhantomData};

use crate::Shape;

//======== Type Information ========

/// A function that formats the name of a type.
///
/// This helps avoid allocations.
pub type TypeNameFn = fn(f: &mut fmt::Formatter<'_>) -> fmt::Result;

//======== Memory Management ========

/// Function to drop a value
///
/// # Safety
///
/// The `value` parameter must point to aligned, initialized memory of the correct type.
/// After calling this function, the memory pointed to by `value` should not be accessed again
/// until it is properly reinitialized.
pub type DropInPlaceFn = for<'mem> unsafe fn(value: PtrMut<'mem>) -> PtrUninit<'mem>;

/// Function to clone a value into another already-allocated value
///
/// # Safety
///
/// The `source` parameter must point to aligned, initialized memory of the correct type.
/// The `target` parameter has the correct layout and alignment, but points to
/// uninitialized memory. The function returns the same pointer wrapped in an [`PtrMut`].
pub type CloneIntoFn =
    for<'src, 'dst> unsafe fn(source: PtrConst<'src>, target: PtrUninit<'dst>) -> PtrMut<'dst>;

//======== Conversion ========

/// Function to try converting from another type
///
/// # Safety
///
/// `source` must point to an initialized value of `source_shape`; it is only
/// read, never moved out of. The `target` parameter has the correct layout and
/// alignment, but points to uninitialized memory. If this function succeeds, it
/// returns `Ok` with the same pointer wrapped in an [`PtrMut`].
pub type TryFromFn = for<'src, 'mem> unsafe fn(
    source: PtrConst<'src>,
    source_shape: &'static Shape,
    target: PtrUninit<'mem>,
) -> Result<PtrMut<'mem>, TryFromError>;

/// Error type for TryFrom conversion failures
#[non_exhaustive]
#[derive(Debug, PartialEq, Clone)]
pub enum TryFromError {
    /// Generic conversion error
    Generic(&'static str),

    /// The target shape has a conversion implementation, but it doesn't support converting from this specific source shape
    UnsupportedSourceShape {
        /// The source shape that failed to convert
        src_shape: &'static Shape,

        /// The shapes that the conversion supports
        expected: &'static [&'static Shape],
    },
}

impl fmt::Display for TryFromError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryFromError::Generic(msg) => write!(f, "{msg}"),
            TryFromError::UnsupportedSourceShape {
                src_shape,
                expected,
            } => {
                write!(f, "Unsupported source shape: {src_shape}, expected one of: ")?;
                for (index, shape) in expected.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{shape}")?;
                }
                Ok(())
            }
        }
    }
}

impl core::error::Error for TryFromError {}

//======== Formatting ========

/// Function to format a value for debug.
/// If this returns None, the shape did not implement Debug.
///
/// # Safety
///
/// `value` must point to an initialized value of the correct type.
pub type DebugFn = for<'mem> unsafe fn(value: PtrConst<'mem>, f: &mut fmt::Formatter<'_>) -> fmt::Result;

/// Debug-formats a type-erased value through its shape's vtable.
///
/// Values without a `Debug` implementation render as `⟨TypeName⟩`.
#[derive(Clone, Copy)]
pub struct ShapedDebug<'mem> {
    shape: &'static Shape,
    data: PtrConst<'mem>,
}

impl<'mem> ShapedDebug<'mem> {
    /// Wraps a value for formatting.
    ///
    /// # Safety
    ///
    /// `data` must point to an initialized value of `shape` for as long as
    /// the wrapper is used.
    pub unsafe fn new(shape: &'static Shape, data: PtrConst<'mem>) -> Self {
        Self { shape, data }
    }
}

impl fmt::Debug for ShapedDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape.vtable.debug {
            Some(debug_fn) => unsafe { debug_fn(self.data, f) },
            None => write!(f, "⟨{}⟩", self.shape),
        }
    }
}

//======== VTable ========

/// VTable for common operations that can be performed on any shape
#[derive(Clone, Copy, Debug)]
pub struct ValueVTable {
    /// cf. [`TypeNameFn`]
    pub type_name: TypeNameFn,

    /// cf. [`DropInPlaceFn`]; `None` for types that need no drop
    pub drop_in_place: Option<DropInPlaceFn>,

    /// cf. [`DebugFn`]
    pub debug: Option<DebugFn>,

    /// cf. [`CloneIntoFn`]
    pub clone_into: Option<CloneIntoFn>,

    /// cf. [`TryFromFn`]
    ///
    /// Used when assigning a value whose kind matches but whose type does
    /// not, e.g. `&str` => `String`
    pub try_from: Option<TryFromFn>,
}

impl ValueVTable {
    /// Check if the type implements the [`Clone`] trait
    pub fn is_clone(&self) -> bool {
        self.clone_into.is_some()
    }

    /// Creates a new [`ValueVTableBuilder`] for a sized type
    pub const fn builder<T>() -> ValueVTableBuilder<T> {
        ValueVTableBuilder::new()
    }
}

unsafe fn drop_value<'mem, T>(value: PtrMut<'mem>) -> PtrUninit<'mem> {
    unsafe { value.drop_in_place::<T>() }
}

/// Builds a [`ValueVTable`]
pub struct ValueVTableBuilder<T> {
    type_name: Option<TypeNameFn>,
    debug: Option<DebugFn>,
    clone_into: Option<CloneIntoFn>,
    try_from: Option<TryFromFn>,
    _pd: PhantomData<T>,
}

impl<T> ValueVTableBuilder<T> {
    /// Creates a new [`ValueVTableBuilder`] with all fields set to `None`.
    ///
    /// The drop function is derived from `T`.
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            type_name: None,
            debug: None,
            clone_into: None,
            try_from: None,
            _pd: PhantomData,
        }
    }

    /// Sets the type name function for this builder.
    pub const fn type_name(mut self, type_name: TypeNameFn) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Sets the debug function for this builder.
    pub const fn debug(mut self, debug: Option<DebugFn>) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the clone_into function for this builder.
    pub const fn clone_into(mut self, clone_into: Option<CloneIntoFn>) -> Self {
        self.clone_into = clone_into;
        self
    }

    /// Sets the try_from function for this builder.
    pub const fn try_from(mut self, try_from: TryFromFn) -> Self {
        self.try_from = Some(try_from);
        self
    }

    /// Builds the [`ValueVTable`] from the current state of the builder.
    pub const fn build(self) -> ValueVTable {
        ValueVTable {
            type_name: self.type_name.unwrap(),
            drop_in_place: if core::mem::needs_drop::<T>() {
                Some(drop_value::<T>)
            } else {
                None
            },
            debug: self.debug,
            clone_into: self.clone_into,
            try_from: self.try_from,
        }
    }
}
