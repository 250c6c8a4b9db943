use super::Field;

/// A struct declared with [`reflect!`](crate::reflect)
#[derive(Clone, Copy, Debug)]
pub struct StructType {
    /// Named fields or a tuple struct
    pub kind: StructKind,

    /// Fields in declaration order, which need not be memory order
    pub fields: &'static [Field],
}

impl StructType {
    /// Returns a builder for StructType
    pub const fn builder() -> StructBuilder {
        StructBuilder::new()
    }

    /// Looks a field up by its exact name
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Builder for [`StructType`]
pub struct StructBuilder {
    kind: Option<StructKind>,
    fields: &'static [Field],
}

impl StructBuilder {
    /// An empty builder
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            kind: None,
            fields: &[],
        }
    }

    /// Named or tuple fields
    pub const fn kind(mut self, kind: StructKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The fields, in declaration order
    pub const fn fields(mut self, fields: &'static [Field]) -> Self {
        self.fields = fields;
        self
    }

    /// Panics at compile time without a kind
    pub const fn build(self) -> StructType {
        StructType {
            kind: self.kind.unwrap(),
            fields: self.fields,
        }
    }
}

/// How a struct spells its fields
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StructKind {
    /// `struct S(T0, T1);`
    TupleStruct,

    /// `struct S { foo: T0, bar: T1 }`
    Struct,
}
