//! Auto-deref specialization helpers.
//!
//! `reflect!` cannot know whether the declared type implements `Debug` or
//! `Clone`. [`impls!`] answers that in const context, and the `Spez` wrapper
//! picks the implementing method: `(&&Spez(value)).spez_debug(f)` resolves to
//! the `Yes` trait when the bound holds and falls back to the `No` trait
//! otherwise. The `No` methods are never reached, because `impls!` gates them.

use core::fmt;

pub use impls::impls;

use crate::{PtrMut, PtrUninit};

/// Wraps a reference for auto-deref specialization.
pub struct Spez<T>(pub T);

/// Picked when the value implements `Debug`.
pub trait SpezDebugYes {
    /// Delegates to `Debug::fmt`.
    fn spez_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: fmt::Debug + ?Sized> SpezDebugYes for &Spez<&T> {
    fn spez_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

/// Picked when the value does not implement `Debug`.
pub trait SpezDebugNo {
    /// Unreachable.
    fn spez_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: ?Sized> SpezDebugNo for Spez<&T> {
    fn spez_debug(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unreachable!()
    }
}

/// Picked when the value implements `Clone`.
pub trait SpezCloneIntoYes {
    /// Clones into `target`.
    ///
    /// # Safety
    ///
    /// `target` must be aligned and sized for the cloned type.
    unsafe fn spez_clone_into<'mem>(&self, target: PtrUninit<'mem>) -> PtrMut<'mem>;
}

impl<T: Clone> SpezCloneIntoYes for &Spez<&T> {
    unsafe fn spez_clone_into<'mem>(&self, target: PtrUninit<'mem>) -> PtrMut<'mem> {
        unsafe { target.put(self.0.clone()) }
    }
}

/// Picked when the value does not implement `Clone`.
pub trait SpezCloneIntoNo {
    /// Unreachable.
    ///
    /// # Safety
    ///
    /// Never call this.
    unsafe fn spez_clone_into<'mem>(&self, target: PtrUninit<'mem>) -> PtrMut<'mem>;
}

impl<T> SpezCloneIntoNo for Spez<&T> {
    unsafe fn spez_clone_into<'mem>(&self, _target: PtrUninit<'mem>) -> PtrMut<'mem> {
        unreachable!()
    }
}
