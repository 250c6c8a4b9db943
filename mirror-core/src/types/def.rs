use super::{DerefFn, Shape};

/// The semantic definition of a shape: is it more like a scalar, a list, a smart pointer?
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// Undefined - you can interact with the type through [`crate::Type`] and
    /// [`crate::ValueVTable`].
    Undefined,

    /// Scalar: those don't have a def, they're not composed of other things.
    ///
    /// e.g. `u32`, `String`, `bool`
    Scalar(ScalarAffinity),

    /// Ordered list of homogeneous values, variable size
    ///
    /// e.g. `Vec<T>`
    List(ListDef),

    /// Optional value
    ///
    /// e.g. `Option<T>`
    Option(OptionDef),

    /// Owning pointer to a single value
    ///
    /// e.g. `Box<T>`
    SmartPointer(SmartPointerDef),
}

/// What a scalar holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarAffinity {
    /// Booleans
    Boolean,
    /// Integers and floats
    Number,
    /// A single `char`
    Char,
    /// Owned or borrowed text
    String,
    /// `()`
    Empty,
}

/// Fields for list types
#[derive(Clone, Copy, Debug)]
pub struct ListDef {
    /// shape of the items in the list
    pub t: fn() -> &'static Shape,
}

impl ListDef {
    /// Returns the shape of the items in the list
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Fields for option types
#[derive(Clone, Copy, Debug)]
pub struct OptionDef {
    /// shape of the inner type of the option
    pub t: fn() -> &'static Shape,
}

impl OptionDef {
    /// Returns the inner shape of the option
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Fields for owning smart pointers
#[derive(Clone, Copy, Debug)]
pub struct SmartPointerDef {
    /// shape of the value the pointer owns
    pub pointee: fn() -> &'static Shape,

    /// Which standard smart pointer this is, if any
    pub known: Option<KnownSmartPointer>,

    /// Borrows the pointee mutably
    pub borrow_mut: DerefFn,
}

/// Smart pointers from the standard library
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownSmartPointer {
    /// [`Box<T>`](alloc::boxed::Box)
    Box,
}
