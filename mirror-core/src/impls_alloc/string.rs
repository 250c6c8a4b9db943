use alloc::string::String;

use crate::{
    Def, Reflect, ScalarAffinity, Shape, TryFromError, Type, UserType, ValueVTable, value_vtable,
};

unsafe impl Reflect<'_> for String {
    const VTABLE: &'static ValueVTable = &const {
        let mut vtable = value_vtable!(String, |f| f.write_str("String"));
        vtable.try_from = Some(|source, source_shape, target| {
            if source_shape.is_type::<&str>() {
                let text = unsafe { source.get::<&str>() };
                Ok(unsafe { target.put(String::from(*text)) })
            } else {
                Err(TryFromError::UnsupportedSourceShape {
                    src_shape: source_shape,
                    expected: &const { [<&'static str as Reflect<'static>>::SHAPE] },
                })
            }
        });
        vtable
    };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("String")
            .def(Def::Scalar(ScalarAffinity::String))
            .ty(Type::User(UserType::Opaque))
            .build()
    };
}

#[cfg(test)]
mod tests {
    use crate::*;
    use core::mem::MaybeUninit;

    #[test]
    fn strings_convert_from_string_slices() {
        let try_from = String::SHAPE.vtable.try_from.unwrap();
        let source = "borrowed";
        let mut target = MaybeUninit::<String>::uninit();
        let converted = unsafe {
            try_from(
                PtrConst::new(&raw const source),
                <&str>::SHAPE,
                PtrUninit::from_maybe_uninit(&mut target),
            )
            .unwrap();
            target.assume_init()
        };
        assert_eq!(converted, "borrowed");
    }

    #[test]
    fn strings_refuse_other_sources() {
        let try_from = String::SHAPE.vtable.try_from.unwrap();
        let source = 5_u8;
        let mut target = MaybeUninit::<String>::uninit();
        let result = unsafe {
            try_from(
                PtrConst::new(&raw const source),
                u8::SHAPE,
                PtrUninit::from_maybe_uninit(&mut target),
            )
        };
        let err = result.err().unwrap();
        assert_eq!(
            err.to_string(),
            "Unsupported source shape: u8, expected one of: &str"
        );
    }
}
