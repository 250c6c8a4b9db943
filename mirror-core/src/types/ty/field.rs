use super::Shape;
use bitflags::bitflags;

/// A field of a struct, tuple struct or tuple
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Declared name; the 0-based index for tuples and tuple structs
    pub name: &'static str,

    /// Shape of the field's type
    pub shape: fn() -> &'static Shape,

    /// Byte offset inside the containing value, from `core::mem::offset_of!`
    pub offset: usize,

    /// Visibility and other per-field facts
    pub flags: FieldFlags,
}

impl Field {
    /// Shape of the field's type
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }

    /// Returns a builder for Field
    pub const fn builder() -> FieldBuilder {
        FieldBuilder::new()
    }

    /// Whether code outside the declaring module may set this field
    pub fn is_exported(&self) -> bool {
        self.flags.contains(FieldFlags::EXPORTED)
    }
}

/// Builder for [`Field`]; `name`, `shape` and `offset` are required
pub struct FieldBuilder {
    name: Option<&'static str>,
    shape: Option<fn() -> &'static Shape>,
    offset: Option<usize>,
    flags: FieldFlags,
}

impl FieldBuilder {
    /// An empty builder
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            name: None,
            shape: None,
            offset: None,
            flags: FieldFlags::EMPTY,
        }
    }

    /// The field name
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// The field type
    pub const fn shape(mut self, shape: fn() -> &'static Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// The byte offset
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The flags, empty by default
    pub const fn flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Panics at compile time when a required part is missing.
    pub const fn build(self) -> Field {
        Field {
            name: self.name.unwrap(),
            shape: self.shape.unwrap(),
            offset: self.offset.unwrap(),
            flags: self.flags,
        }
    }
}

bitflags! {
    /// Per-field facts read by the reflection engine
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct FieldFlags: u64 {
        /// No flags
        const EMPTY = 0;

        /// Declared with some `pub` visibility, so it may be set by injection
        const EXPORTED = 1 << 0;
    }
}

impl FieldFlags {
    /// Flags for a field declared with the given visibility, as produced by
    /// `stringify!` on a `vis` fragment.
    pub const fn for_visibility(vis: &str) -> Self {
        if vis.is_empty() {
            Self::EMPTY
        } else {
            Self::EXPORTED
        }
    }
}
