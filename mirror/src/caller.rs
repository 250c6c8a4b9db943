use alloc::vec::Vec;

use mirror_core::{FunctionPointerDef, Reflect, Shape};
use owo_colors::OwoColorize;

use crate::{Callee, ReflectError, Value, bind};

/// Calls a function value with dynamically typed arguments.
///
/// Any `fn` pointer of up to six parameters can be wrapped. Closures and
/// function items must be coerced to a pointer type first, and parameters
/// that borrow must spell out `'static`:
///
/// ```
/// use mirror::{Caller, args};
///
/// fn check(n: i32, label: &'static str) -> bool {
///     n as usize == label.len()
/// }
///
/// let caller = Caller::new(check as fn(i32, &'static str) -> bool);
/// let outputs = caller.call(args![3, "abc"]).unwrap();
/// assert_eq!(outputs[0].get::<bool>().unwrap(), &true);
///
/// // the same call, with arguments matched by type
/// let outputs = caller.call_type(args!["abc", 3]).unwrap();
/// assert_eq!(outputs[0].get::<bool>().unwrap(), &true);
/// ```
///
/// Calls return their outputs as a list: empty for `()`, one value per
/// element for tuples, a single value otherwise.
pub struct Caller {
    function: Value,
}

impl Caller {
    /// Wraps a function value
    pub fn new<F: Reflect<'static>>(function: F) -> Self {
        Self::from_value(Value::new(function))
    }

    /// Wraps a value that should be a function.
    ///
    /// Whether it is one is only checked when it is called.
    pub fn from_value(function: Value) -> Self {
        Self { function }
    }

    /// The shape of the wrapped value
    pub fn shape(&self) -> &'static Shape {
        self.function.shape()
    }

    fn signature(&self) -> Result<&'static FunctionPointerDef, ReflectError> {
        let shape = self.function.shape();
        shape
            .underlying()
            .function()
            .ok_or(ReflectError::NotCallable { shape })
    }

    /// Calls the function, binding `args[i]` to parameter `i`.
    ///
    /// Each argument must have the kind of its parameter. Arguments of the
    /// same kind but another type are converted when possible, e.g. a
    /// newtype with a `pub` field for the type it wraps, or `&str` for `String`.
    pub fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, ReflectError> {
        let signature = self.signature()?;
        let callee = Callee::Function(self.shape());
        let bound = bind::positional(callee, signature.parameters, args)?;
        Ok(self.call_bound(signature, bound))
    }

    /// Calls the function, binding every parameter to the argument of its
    /// exact type regardless of order.
    ///
    /// When several arguments share a type, the last one is used for every
    /// parameter of that type.
    pub fn call_type(&self, args: Vec<Value>) -> Result<Vec<Value>, ReflectError> {
        let signature = self.signature()?;
        let callee = Callee::Function(self.shape());
        let bound = bind::by_type(callee, signature.parameters, args)?;
        Ok(self.call_bound(signature, bound))
    }

    fn call_bound(&self, signature: &'static FunctionPointerDef, args: Vec<Value>) -> Vec<Value> {
        log::debug!(
            "Calling {} with {} argument(s)",
            self.shape().blue(),
            args.len()
        );
        let function = self.function.as_const();
        bind::invoke(signature.return_shape(), args, |args, out| unsafe {
            (signature.call)(function, args, out);
        })
    }
}
