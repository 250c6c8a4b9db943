use core::mem::MaybeUninit;

use alloc::vec::Vec;

use crate::*;

unsafe impl<'a, T> Reflect<'a> for Vec<T>
where
    T: Reflect<'a>,
{
    const VTABLE: &'static ValueVTable = &const {
        ValueVTable::builder::<Self>()
            .type_name(|f| {
                write!(f, "Vec<")?;
                (T::VTABLE.type_name)(f)?;
                write!(f, ">")
            })
            .debug(Some(|value, f| {
                let items = unsafe { value.get::<Self>() };
                f.debug_list()
                    .entries(
                        items
                            .iter()
                            .map(|item| unsafe { ShapedDebug::new(T::SHAPE, PtrConst::new(item)) }),
                    )
                    .finish()
            }))
            .clone_into(if T::VTABLE.clone_into.is_some() {
                Some(|src, dst| unsafe {
                    let Some(clone_item) = T::VTABLE.clone_into else {
                        unreachable!()
                    };
                    let items = src.get::<Self>();
                    let mut cloned = Vec::with_capacity(items.len());
                    for item in items {
                        let mut slot = MaybeUninit::<T>::uninit();
                        clone_item(PtrConst::new(item), PtrUninit::from_maybe_uninit(&mut slot));
                        cloned.push(slot.assume_init());
                    }
                    dst.put(cloned)
                })
            } else {
                None
            })
            .build()
    };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("Vec")
            .def(Def::List(ListDef { t: || T::SHAPE }))
            .ty(Type::User(UserType::Opaque))
            .build()
    };
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn vectors_are_lists_of_their_element() {
        let shape = <Vec<u16>>::SHAPE;
        assert_eq!(shape.kind(), Kind::List);
        assert_eq!(format!("{shape}"), "Vec<u16>");
        let Def::List(list) = shape.def else {
            panic!("expected a list def, got {:?}", shape.def);
        };
        assert_eq!(list.t(), u16::SHAPE);
    }

    #[test]
    fn vectors_debug_format_their_items() {
        let items = vec![String::from("a"), String::from("b")];
        let rendered = format!("{:?}", unsafe {
            ShapedDebug::new(<Vec<String>>::SHAPE, PtrConst::new(&raw const items))
        });
        assert_eq!(rendered, r#"["a", "b"]"#);
    }
}
