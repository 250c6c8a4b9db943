use core::{fmt, mem::MaybeUninit};

use crate::{
    Def, OptionDef, PtrConst, PtrUninit, Reflect, Shape, ShapedDebug, Type, UserType,
    ValueVTable,
};

unsafe impl<'a, T: Reflect<'a>> Reflect<'a> for Option<T> {
    const VTABLE: &'static ValueVTable = &const {
        ValueVTable::builder::<Self>()
            .type_name(|f| {
                write!(f, "Option<")?;
                (T::VTABLE.type_name)(f)?;
                write!(f, ">")
            })
            .debug(Some(|value, f| match unsafe { value.get::<Self>() } {
                Some(inner) => f
                    .debug_tuple("Some")
                    .field(&unsafe { ShapedDebug::new(T::SHAPE, PtrConst::new(inner)) })
                    .finish(),
                None => fmt::Formatter::write_str(f, "None"),
            }))
            .clone_into(if T::VTABLE.clone_into.is_some() {
                Some(|src, dst| unsafe {
                    let Some(clone_inner) = T::VTABLE.clone_into else {
                        unreachable!()
                    };
                    match src.get::<Self>() {
                        Some(inner) => {
                            let mut slot = MaybeUninit::<T>::uninit();
                            clone_inner(PtrConst::new(inner), PtrUninit::from_maybe_uninit(&mut slot));
                            dst.put(Some(slot.assume_init()))
                        }
                        None => dst.put(None::<T>),
                    }
                })
            } else {
                None
            })
            .build()
    };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("Option")
            .def(Def::Option(OptionDef { t: || T::SHAPE }))
            .ty(Type::User(UserType::Opaque))
            .build()
    };
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn options_clone_through_their_element() {
        let original = Some(String::from("kept"));
        let mut copy = core::mem::MaybeUninit::<Option<String>>::uninit();
        let clone_into = <Option<String>>::SHAPE.vtable.clone_into.unwrap();
        let copy = unsafe {
            clone_into(
                PtrConst::new(&raw const original),
                PtrUninit::from_maybe_uninit(&mut copy),
            );
            copy.assume_init()
        };
        assert_eq!(copy, original);
        assert_eq!(<Option<String>>::SHAPE.kind(), Kind::Option);
        assert_eq!(format!("{}", <Option<String>>::SHAPE), "Option<String>");
    }
}
