#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

#[cfg(feature = "alloc")]
extern crate alloc;

mod macros;
pub use macros::*;

// Opaque pointer utilities
mod ptr;
pub use ptr::*;

// Specialization utilities
pub mod spez;

// Definition for `core::` types
mod impls_core;

// Definition for `alloc::` types
#[cfg(feature = "alloc")]
mod impls_alloc;

// Const type Id
mod typeid;
pub use typeid::*;

// Type definitions
mod types;
#[allow(unused_imports)]
pub use types::*;

/// Allows querying the [`Shape`] of a type, which in turn lets us inspect its
/// fields, call it if it is a function, call its exposed methods, etc.
///
/// # Safety
///
/// If you implement this wrong, every safe abstraction in `mirror` is unsound.
///
/// You're responsible for describing the type layout properly, and annotating all the invariants.
/// Prefer [`reflect!`] for your own types.
pub unsafe trait Reflect<'a>: 'a {
    /// The shape of this type
    ///
    /// Shape embeds all other constants of this trait.
    const SHAPE: &'static Shape;

    /// Function pointers to perform various operations: print the full type
    /// name (with generic type parameters), the Debug implementation, clone,
    /// convert, drop.
    ///
    /// If [`Self::SHAPE`] has `ShapeLayout::Unsized`, then the parent pointer needs to be passed.
    const VTABLE: &'static ValueVTable;
}
