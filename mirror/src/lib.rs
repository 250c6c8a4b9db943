#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

pub use mirror_core::*;

mod error;
pub use error::*;

mod value;
pub use value::*;

mod bind;

mod caller;
pub use caller::*;

mod reflector;
pub use reflector::*;

mod diagnostics;
pub use diagnostics::*;

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec;
    pub use alloc::vec::Vec;
}

/// Builds a `Vec<Value>` out of plain expressions, one [`Value`] each.
///
/// ```
/// use mirror::{Kind, args};
///
/// let args = args![1_u8, "two", 3.0];
/// let kinds: Vec<Kind> = args.iter().map(|arg| arg.kind()).collect();
/// assert_eq!(kinds, [Kind::U8, Kind::String, Kind::F64]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::__private::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__private::vec![$($crate::Value::new($arg)),+]
    };
}
