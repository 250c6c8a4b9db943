use core::fmt;

use crate::{
    PointerType, PtrConst, Reflect, Shape, ShapedDebug, Type, ValuePointerType, ValueVTable,
};

macro_rules! impl_reflect_for_reference {
    ($type:ty, mutable: $mutable:expr, prefix: $prefix:literal, clone_into: $clone_into:expr) => {
        unsafe impl<'a, T: Reflect<'a> + ?Sized> Reflect<'a> for $type {
            const VTABLE: &'static ValueVTable = &const {
                ValueVTable::builder::<Self>()
                    .type_name(|f| {
                        f.write_str($prefix)?;
                        (T::VTABLE.type_name)(f)
                    })
                    .debug(Some(|data, f| {
                        // a wide pointee's vtable takes the pointer to the reference itself
                        let target = if size_of::<Self>() == size_of::<*const ()>() {
                            PtrConst::new(unsafe { data.read::<*const u8>() })
                        } else {
                            data
                        };
                        fmt::Debug::fmt(&unsafe { ShapedDebug::new(T::SHAPE, target) }, f)
                    }))
                    .clone_into($clone_into)
                    .build()
            };

            const SHAPE: &'static Shape = &const {
                Shape::builder_for_sized::<Self>()
                    .type_identifier(concat!($prefix, "_"))
                    .ty(Type::Pointer(PointerType::Reference(ValuePointerType {
                        mutable: $mutable,
                        wide: size_of::<Self>() != size_of::<*const ()>(),
                        target: || T::SHAPE,
                    })))
                    .build()
            };
        }
    };
}

impl_reflect_for_reference!(
    &'a T,
    mutable: false,
    prefix: "&",
    clone_into: Some(|src, dst| unsafe { dst.put(src.read::<Self>()) })
);
impl_reflect_for_reference!(&'a mut T, mutable: true, prefix: "&mut ", clone_into: None);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn string_slices_have_string_kind() {
        assert_eq!(<&str>::SHAPE.kind(), Kind::String);
        assert_eq!(format!("{}", <&str>::SHAPE), "&str");
    }

    #[test]
    fn references_to_sized_values_are_pointers() {
        assert_eq!(<&u8>::SHAPE.kind(), Kind::Pointer);
        assert_eq!(<&mut u8>::SHAPE.kind(), Kind::Pointer);
        assert_eq!(format!("{}", <&mut Vec<u8>>::SHAPE), "&mut Vec<u8>");
    }

    #[test]
    fn debug_sees_through_references() {
        let word = "hi";
        let rendered = format!("{:?}", unsafe {
            ShapedDebug::new(<&str>::SHAPE, PtrConst::new(&raw const word))
        });
        assert_eq!(rendered, r#""hi""#);

        let number = 7_u64;
        let reference = &number;
        let rendered = format!("{:?}", unsafe {
            ShapedDebug::new(<&u64>::SHAPE, PtrConst::new(&raw const reference))
        });
        assert_eq!(rendered, "7");
    }
}
