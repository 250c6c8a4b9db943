use alloc::{boxed::Box, rc::Rc, sync::Arc};
use core::fmt;

use mirror_core::Shape;
use owo_colors::OwoColorize;

/// A hint that an injection probably does not do what the caller meant.
///
/// Advisories never fail the operation that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Advisory {
    /// `inject` was called, but only `map_type` entries were recorded
    OnlyTypeEntries {
        /// The struct being injected into
        shape: &'static Shape,
    },

    /// `inject_type` was called, but only `map` entries were recorded
    OnlyNameEntries {
        /// The struct being injected into
        shape: &'static Shape,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::OnlyTypeEntries { shape } => write!(
                f,
                "Injecting into {shape} by field name, but only values mapped by type were given: did you mean inject_type?"
            ),
            Advisory::OnlyNameEntries { shape } => write!(
                f,
                "Injecting into {shape} by field type, but only values mapped by name were given: did you mean inject?"
            ),
        }
    }
}

/// Receives the advisories raised by a [`Reflector`](crate::Reflector)
pub trait Diagnostics {
    /// Reports one advisory
    fn advise(&self, advisory: &Advisory);
}

/// Forwards advisories to the `log` facade as warnings.
///
/// This is what a [`Reflector`](crate::Reflector) uses unless told otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn advise(&self, advisory: &Advisory) {
        log::warn!("{}", advisory.yellow());
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn advise(&self, advisory: &Advisory) {
        (**self).advise(advisory)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for Box<D> {
    fn advise(&self, advisory: &Advisory) {
        (**self).advise(advisory)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for Rc<D> {
    fn advise(&self, advisory: &Advisory) {
        (**self).advise(advisory)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for Arc<D> {
    fn advise(&self, advisory: &Advisory) {
        (**self).advise(advisory)
    }
}
