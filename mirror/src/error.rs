use alloc::string::String;
use core::fmt;

use mirror_core::{Kind, Shape};

/// What was being called when binding arguments failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    /// A function value held by a [`Caller`](crate::Caller)
    Function(&'static Shape),

    /// A method exposed by a struct
    Method {
        /// The struct the method was found on
        receiver: &'static Shape,
        /// The method name
        name: &'static str,
    },
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callee::Function(shape) => write!(f, "{shape}"),
            Callee::Method { receiver, name } => write!(f, "{receiver}::{name}"),
        }
    }
}

/// Errors that can occur when calling, invoking or injecting through reflection.
#[derive(Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum ReflectError {
    /// The wrapped value is not a function
    NotCallable {
        /// The shape of the wrapped value
        shape: &'static Shape,
    },

    /// The number of arguments differs from the number of declared parameters
    ArityMismatch {
        /// What was being called
        callee: Callee,
        /// The number of declared parameters
        expected: usize,
        /// The number of arguments given
        actual: usize,
    },

    /// A positional argument has a different kind than its parameter
    KindMismatch {
        /// What was being called
        callee: Callee,
        /// The parameter position
        index: usize,
        /// The kind of the parameter
        expected: Kind,
        /// The kind of the argument
        actual: Kind,
        /// Debug rendering of the argument
        value: String,
    },

    /// A type-keyed call has no argument of a parameter's exact type
    TypeNotProvided {
        /// What was being called
        callee: Callee,
        /// The parameter position
        index: usize,
        /// The type nobody provided
        missing: &'static Shape,
    },

    /// The target does not resolve to a struct with named fields
    NotAnAggregate {
        /// The shape of the target, before resolution
        shape: &'static Shape,
    },

    /// A value mapped by field name has a different kind than the field
    FieldKindMismatch {
        /// The struct containing the field
        shape: &'static Shape,
        /// The field name
        field: &'static str,
        /// The kind of the field
        expected: Kind,
        /// The kind of the mapped value
        actual: Kind,
        /// Debug rendering of the mapped value
        value: String,
    },

    /// The struct exposes no method of that name
    MethodNotFound {
        /// The struct that was searched
        shape: &'static Shape,
        /// The name that was looked up
        name: String,
    },

    /// Kinds agree, but the value cannot be represented as the slot's type
    Unassignable {
        /// The type of the slot
        expected: &'static Shape,
        /// The type of the value
        actual: &'static Shape,
    },

    /// A mutation was requested through a shared reference
    Immutable {
        /// The struct behind the shared reference
        shape: &'static Shape,
        /// What was attempted
        operation: &'static str,
    },

    /// A value had to be duplicated, but its type is not `Clone`
    NotCloneable {
        /// The type that could not be cloned
        shape: &'static Shape,
    },

    /// Tried to get the wrong shape out of a value, e.g. it holds a `String`
    /// but `.get()` was called with a `u64`.
    WrongShape {
        /// The shape that was asked for
        expected: &'static Shape,
        /// The shape of the value
        actual: &'static Shape,
    },
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectError::NotCallable { shape } => {
                write!(
                    f,
                    "Cannot call a value of type {shape}: its kind is {}, not function",
                    shape.kind()
                )
            }
            ReflectError::ArityMismatch {
                callee,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{callee} takes {expected} argument(s), but {actual} were given"
                )
            }
            ReflectError::KindMismatch {
                callee,
                index,
                expected,
                actual,
                value,
            } => {
                write!(
                    f,
                    "Parameter {index} of {callee} has kind {expected}, but argument {value} has kind {actual}"
                )
            }
            ReflectError::TypeNotProvided {
                callee,
                index,
                missing,
            } => {
                write!(
                    f,
                    "Parameter {index} of {callee} needs a {missing}, but no argument has that type"
                )
            }
            ReflectError::NotAnAggregate { shape } => {
                write!(f, "{shape} does not lead to a struct with named fields")
            }
            ReflectError::FieldKindMismatch {
                shape,
                field,
                expected,
                actual,
                value,
            } => {
                write!(
                    f,
                    "Field '{shape}::{field}' has kind {expected}, but the value {value} has kind {actual}"
                )
            }
            ReflectError::MethodNotFound { shape, name } => {
                write!(f, "{shape} has no method named '{name}'")
            }
            ReflectError::Unassignable { expected, actual } => {
                write!(f, "A {actual} cannot be assigned to a {expected}")
            }
            ReflectError::Immutable { shape, operation } => {
                write!(
                    f,
                    "Cannot {operation}: {shape} is behind a shared reference"
                )
            }
            ReflectError::NotCloneable { shape } => {
                write!(
                    f,
                    "{shape} needs to be cloned, but does not implement Clone"
                )
            }
            ReflectError::WrongShape { expected, actual } => {
                write!(f, "Wrong shape: expected {expected}, but got {actual}")
            }
        }
    }
}

impl core::error::Error for ReflectError {}
