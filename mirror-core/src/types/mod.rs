//! structs and vtable definitions used by mirror

use core::alloc::Layout;

mod value;
pub use value::*;

mod def;
pub use def::*;

mod ty;
pub use ty::*;

mod kind;
pub use kind::*;

mod method;
pub use method::*;

use crate::{ConstTypeId, PtrMut, PtrUninit, Reflect};

/// Schema for reflection of a type
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct Shape {
    /// Unique type identifier, provided by the compiler. Lifetimes are erased.
    pub id: ConstTypeId,

    /// Size and alignment, enough to allocate a value of this type
    /// (but not initialize it.)
    pub layout: ShapeLayout,

    /// Function pointers to perform various operations: print the full type
    /// name, debug-format, clone, convert from another shape, drop.
    ///
    /// If the shape has `ShapeLayout::Unsized`, then the parent pointer needs to be passed.
    pub vtable: &'static ValueVTable,

    /// Underlying type: primitive, sequence, user, pointer.
    ///
    /// This follows the [`Rust Reference`](https://doc.rust-lang.org/reference/types.html).
    pub ty: Type,

    /// Functional definition of the value: scalar affinity, list or option
    /// element, smart pointer pointee.
    pub def: Def,

    /// Identifier for a type: the type's name without generic parameters. To get the type's full
    /// name with generic parameters, see [`ValueVTable::type_name`].
    pub type_identifier: &'static str,

    /// Methods exposed for dynamic invocation, in declaration order
    pub methods: &'static [MethodDef],
}

/// Layout of the shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeLayout {
    /// `Sized` type
    Sized(Layout),
    /// `!Sized` type
    Unsized,
}

impl ShapeLayout {
    /// `Layout` if this type is `Sized`
    pub fn sized_layout(self) -> Result<Layout, UnsizedError> {
        match self {
            ShapeLayout::Sized(layout) => Ok(layout),
            ShapeLayout::Unsized => Err(UnsizedError),
        }
    }
}

/// Tried to get the `Layout` of an unsized type
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct UnsizedError;

impl core::fmt::Display for UnsizedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Not a Sized type")
    }
}

impl core::error::Error for UnsizedError {}

impl Shape {
    /// Returns a builder for a shape for some type `T`.
    pub const fn builder_for_sized<'a, T: Reflect<'a>>() -> ShapeBuilder {
        ShapeBuilder::new(T::VTABLE)
            .layout(Layout::new::<T>())
            .id(ConstTypeId::of::<T>())
    }

    /// Returns a builder for a shape for some type `T`.
    pub const fn builder_for_unsized<'a, T: Reflect<'a> + ?Sized>() -> ShapeBuilder {
        ShapeBuilder::new(T::VTABLE)
            .set_unsized()
            .id(ConstTypeId::of::<T>())
    }

    /// Check if this shape is of the given type
    pub fn is_type<'a, Other: Reflect<'a> + ?Sized>(&self) -> bool {
        self == Other::SHAPE
    }

    /// The coarse category this shape belongs to.
    ///
    /// Newtypes report the kind of the type they wrap.
    pub fn kind(&'static self) -> Kind {
        let shape = self.underlying();
        match shape.ty {
            Type::Primitive(PrimitiveType::Boolean) => Kind::Bool,
            Type::Primitive(PrimitiveType::Textual(TextualType::Char)) => Kind::Char,
            Type::Primitive(PrimitiveType::Textual(TextualType::Str)) => Kind::String,
            Type::Primitive(PrimitiveType::Numeric(numeric)) => {
                let size = match shape.layout {
                    ShapeLayout::Sized(layout) => layout.size(),
                    ShapeLayout::Unsized => return Kind::Opaque,
                };
                Kind::numeric(numeric, size)
            }
            Type::Sequence(SequenceType::Tuple(TupleType { fields })) => {
                if fields.is_empty() {
                    Kind::Unit
                } else {
                    Kind::Tuple
                }
            }
            Type::User(UserType::Struct(_)) => Kind::Struct,
            Type::User(UserType::Opaque) => match shape.def {
                Def::Scalar(ScalarAffinity::String) => Kind::String,
                Def::List(_) => Kind::List,
                Def::Option(_) => Kind::Option,
                Def::SmartPointer(_) => Kind::Pointer,
                _ => Kind::Opaque,
            },
            Type::Pointer(PointerType::Reference(pointer)) => {
                if (pointer.target)().is_type::<str>() {
                    Kind::String
                } else {
                    Kind::Pointer
                }
            }
            Type::Pointer(PointerType::Function(_)) => Kind::Function,
        }
    }

    /// The type a newtype wraps, if this shape is one.
    ///
    /// A newtype is a tuple struct with exactly one field, stored at offset 0
    /// with the same layout as the struct itself.
    pub fn newtype_inner(&self) -> Option<&'static Shape> {
        let Type::User(UserType::Struct(StructType {
            kind: StructKind::TupleStruct,
            fields: [field],
        })) = self.ty
        else {
            return None;
        };
        let inner = field.shape();
        (field.offset == 0 && inner.layout == self.layout).then_some(inner)
    }

    /// Peels newtypes until reaching a shape that is not one.
    pub fn underlying(&'static self) -> &'static Shape {
        let mut shape = self;
        while let Some(inner) = shape.newtype_inner() {
            shape = inner;
        }
        shape
    }

    /// Peels only the newtypes whose field is `pub`.
    ///
    /// Values are converted through this base when assigned, so a newtype
    /// with a private field is never built from, or taken apart into, what it
    /// wraps.
    pub fn transparent_base(&'static self) -> &'static Shape {
        let mut shape = self;
        while let Some(inner) = shape.newtype_inner() {
            if !shape.newtype_field_exported() {
                break;
            }
            shape = inner;
        }
        shape
    }

    fn newtype_field_exported(&self) -> bool {
        matches!(
            self.ty,
            Type::User(UserType::Struct(StructType { fields: [field], .. })) if field.is_exported()
        )
    }

    /// The field layout, if this shape is a struct with named fields
    pub fn aggregate(&'static self) -> Option<&'static StructType> {
        match &self.ty {
            Type::User(UserType::Struct(struct_type))
                if struct_type.kind == StructKind::Struct =>
            {
                Some(struct_type)
            }
            _ => None,
        }
    }

    /// The element layout, if this shape is a tuple (including `()`)
    pub fn tuple(&'static self) -> Option<&'static TupleType> {
        match &self.ty {
            Type::Sequence(SequenceType::Tuple(tuple)) => Some(tuple),
            _ => None,
        }
    }

    /// The signature and call primitive, if this shape is a function pointer
    pub fn function(&'static self) -> Option<&'static FunctionPointerDef> {
        match &self.ty {
            Type::Pointer(PointerType::Function(function)) => Some(function),
            _ => None,
        }
    }

    /// Looks up an exposed method by its exact name
    pub fn method(&self, name: &str) -> Option<&'static MethodDef> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// How to step through this shape to the value it points at, for
    /// references to sized types and smart pointers.
    pub fn deref_target(&self) -> Option<DerefTarget> {
        match (self.ty, self.def) {
            (Type::Pointer(PointerType::Reference(pointer)), _) if !pointer.wide => {
                Some(DerefTarget {
                    target: (pointer.target)(),
                    mutable: pointer.mutable,
                    deref: deref_thin_pointer,
                })
            }
            (_, Def::SmartPointer(smart_pointer)) => Some(DerefTarget {
                target: (smart_pointer.pointee)(),
                mutable: true,
                deref: smart_pointer.borrow_mut,
            }),
            _ => None,
        }
    }
}

/// One step of indirection, see [`Shape::deref_target`]
#[derive(Clone, Copy, Debug)]
pub struct DerefTarget {
    /// What the pointer points at
    pub target: &'static Shape,
    /// Whether the target may be written through this pointer
    pub mutable: bool,
    /// Turns a pointer to the pointer into a pointer to the target
    pub deref: DerefFn,
}

/// Given a pointer to a pointer-like value, returns a pointer to its pointee.
///
/// # Safety
///
/// `this` must point to an initialized value of the shape this function was
/// taken from.
pub type DerefFn = for<'mem> unsafe fn(this: PtrMut<'mem>) -> PtrMut<'mem>;

unsafe fn deref_thin_pointer<'mem>(this: PtrMut<'mem>) -> PtrMut<'mem> {
    PtrMut::new(unsafe { this.read::<*mut u8>() })
}

/// Builder for [`Shape`]
pub struct ShapeBuilder {
    id: Option<ConstTypeId>,
    layout: Option<ShapeLayout>,
    vtable: &'static ValueVTable,
    def: Def,
    ty: Option<Type>,
    type_identifier: Option<&'static str>,
    methods: &'static [MethodDef],
}

impl ShapeBuilder {
    /// Creates a new `ShapeBuilder` with all fields set to `None`.
    #[allow(clippy::new_without_default)]
    pub const fn new(vtable: &'static ValueVTable) -> Self {
        Self {
            id: None,
            layout: None,
            vtable,
            def: Def::Undefined,
            ty: None,
            type_identifier: None,
            methods: &[],
        }
    }

    /// Sets the id field of the `ShapeBuilder`.
    #[inline]
    pub const fn id(mut self, id: ConstTypeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the `layout` field of the `ShapeBuilder`.
    #[inline]
    pub const fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(ShapeLayout::Sized(layout));
        self
    }

    /// Sets the type as unsized
    #[inline]
    pub const fn set_unsized(mut self) -> Self {
        self.layout = Some(ShapeLayout::Unsized);
        self
    }

    /// Sets the `def` field of the `ShapeBuilder`.
    #[inline]
    pub const fn def(mut self, def: Def) -> Self {
        self.def = def;
        self
    }

    /// Sets the `ty` field of the `ShapeBuilder`.
    #[inline]
    pub const fn ty(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the `type_identifier` field of the `ShapeBuilder`.
    #[inline]
    pub const fn type_identifier(mut self, type_identifier: &'static str) -> Self {
        self.type_identifier = Some(type_identifier);
        self
    }

    /// Sets the `methods` field of the `ShapeBuilder`.
    #[inline]
    pub const fn methods(mut self, methods: &'static [MethodDef]) -> Self {
        self.methods = methods;
        self
    }

    /// Builds a `Shape` from the `ShapeBuilder`.
    ///
    /// # Panics
    ///
    /// This method will panic if any of the required fields (`id`, `layout`, `type_identifier`, or `ty`) are `None`.
    #[inline]
    pub const fn build(self) -> Shape {
        Shape {
            id: self.id.unwrap(),
            layout: self.layout.unwrap(),
            vtable: self.vtable,
            type_identifier: self.type_identifier.unwrap(),
            def: self.def,
            ty: self.ty.unwrap(),
            methods: self.methods,
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl core::hash::Hash for Shape {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Helper struct to format the name for display
impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        (self.vtable.type_name)(f)
    }
}

impl core::fmt::Debug for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug_struct = f.debug_struct("Shape");

        // Always show the type name
        debug_struct.field("type", &format_args!("{}", self));

        // Show def if it's not Undefined
        if !matches!(self.def, Def::Undefined) {
            debug_struct.field("def", &format_args!("{:?}", self.def));
        }

        if !self.methods.is_empty() {
            debug_struct.field("methods", &self.methods.len());
        }

        debug_struct.finish()
    }
}

/// Allocates heap storage for a value of the given layout.
///
/// Zero-sized layouts get a dangling, well-aligned pointer and no allocation.
#[cfg(feature = "alloc")]
pub fn allocate_layout(layout: Layout) -> PtrUninit<'static> {
    if layout.size() == 0 {
        return PtrUninit::new(core::ptr::without_provenance_mut::<u8>(layout.align()));
    }
    // SAFETY: We have checked that layout's size is non-zero
    let ptr = unsafe { alloc::alloc::alloc(layout) };
    if ptr.is_null() {
        alloc::alloc::handle_alloc_error(layout);
    }
    PtrUninit::new(ptr)
}

impl Shape {
    /// Heap-allocate a value of this shape
    #[cfg(feature = "alloc")]
    #[inline]
    pub fn allocate(&self) -> Result<PtrUninit<'static>, UnsizedError> {
        Ok(allocate_layout(self.layout.sized_layout()?))
    }

    /// Deallocate a heap-allocated value of this shape, without dropping it
    ///
    /// # Safety
    ///
    /// - `ptr` must have been allocated using [`Self::allocate`] (or [`allocate_layout`]
    ///   with this shape's layout).
    /// - `ptr` must point to a region that is not already deallocated.
    #[cfg(feature = "alloc")]
    pub unsafe fn deallocate_uninit(&self, ptr: PtrUninit<'_>) -> Result<(), UnsizedError> {
        use alloc::alloc::dealloc;

        let layout = self.layout.sized_layout()?;

        if layout.size() == 0 {
            // Nothing to deallocate
            return Ok(());
        }
        // SAFETY: The user guarantees ptr is valid and from allocate, we checked size isn't 0
        unsafe { dealloc(ptr.as_mut_byte_ptr(), layout) }

        Ok(())
    }
}
