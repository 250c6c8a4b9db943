//! A `TypeId` that can be built in const contexts, for types that are not `'static`.

use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Type identity that ignores lifetimes.
///
/// `&'a str` and `&'static str` share an id, which is what shapes need: a
/// shape describes a type's layout and behavior, and neither depends on
/// lifetimes.
#[derive(Clone, Copy)]
pub struct ConstTypeId {
    type_id_fn: fn() -> TypeId,
}

impl ConstTypeId {
    /// The id of `T`, with its lifetimes erased.
    pub const fn of<T: ?Sized>() -> Self {
        Self {
            type_id_fn: erased_type_id::<T>,
        }
    }

    /// Resolves to a regular [`TypeId`].
    #[inline]
    pub fn get(self) -> TypeId {
        (self.type_id_fn)()
    }
}

fn erased_type_id<T: ?Sized>() -> TypeId {
    trait NonStaticAny {
        fn get_type_id(&self) -> TypeId
        where
            Self: 'static;
    }

    impl<T: ?Sized> NonStaticAny for PhantomData<T> {
        fn get_type_id(&self) -> TypeId
        where
            Self: 'static,
        {
            TypeId::of::<T>()
        }
    }

    let phantom_data = PhantomData::<T>;
    // SAFETY: `get_type_id` only inspects the type, never the (zero-sized) value,
    // and `TypeId` carries no lifetime information.
    NonStaticAny::get_type_id(unsafe {
        core::mem::transmute::<&dyn NonStaticAny, &(dyn NonStaticAny + 'static)>(&phantom_data)
    })
}

impl PartialEq for ConstTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for ConstTypeId {}

impl Hash for ConstTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

impl fmt::Debug for ConstTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.get(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetimes_are_erased() {
        fn id_of<'a>(_: &'a str) -> ConstTypeId {
            ConstTypeId::of::<&'a str>()
        }
        let local = String::from("local");
        assert_eq!(id_of(&local), ConstTypeId::of::<&'static str>());
    }

    #[test]
    fn distinct_types_differ() {
        assert_ne!(ConstTypeId::of::<u32>(), ConstTypeId::of::<i32>());
        assert_ne!(ConstTypeId::of::<&str>(), ConstTypeId::of::<&mut str>());
    }
}
