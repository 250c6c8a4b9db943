use core::{fmt, mem};

use crate::{
    Field, FieldFlags, Reflect, SequenceType, Shape, ShapedDebug, TupleType, Type,
    ValueVTable,
};

#[inline(always)]
pub(crate) fn write_type_name_list(
    f: &mut fmt::Formatter<'_>,
    open: &'static str,
    delimiter: &'static str,
    close: &'static str,
    shapes: &[&'static Shape],
) -> fmt::Result {
    f.write_str(open)?;
    for (index, shape) in shapes.iter().enumerate() {
        if index > 0 {
            f.write_str(delimiter)?;
        }
        write!(f, "{shape}")?;
    }
    f.write_str(close)
}

const fn all_clone(shapes: &[&'static Shape]) -> bool {
    let mut index = 0;
    while index < shapes.len() {
        if shapes[index].vtable.clone_into.is_none() {
            return false;
        }
        index += 1;
    }
    true
}

macro_rules! impl_reflect_for_tuple {
    // Used to implement the next bigger tuple type, by taking the next typename & associated index
    // out of `remaining`, if it exists.
    {
        continue from ($($elems:ident.$idx:tt,)+),
        remaining ()
    } => {};
    {
        continue from ($($elems:ident.$idx:tt,)+),
        remaining ($next:ident.$nextidx:tt, $($remaining:ident.$remainingidx:tt,)*)
    } => {
        impl_reflect_for_tuple! {
            impl ($($elems.$idx,)+ $next.$nextidx,),
            remaining ($($remaining.$remainingidx,)*)
        }
    };
    // Actually generate the trait implementation, and keep the remaining possible elements around
    {
        impl ($($elems:ident.$idx:tt,)+),
        remaining ($($remaining:ident.$remainingidx:tt,)*)
    } => {
        unsafe impl<'a $(, $elems)+> Reflect<'a> for ($($elems,)+)
        where
            $($elems: Reflect<'a>,)+
        {
            const VTABLE: &'static ValueVTable = &const {
                ValueVTable::builder::<Self>()
                    .type_name(|f| {
                        write_type_name_list(f, "(", ", ", ")", &[$($elems::SHAPE),+])
                    })
                    .debug(Some(|value, f| {
                        let mut tuple = f.debug_tuple("");
                        $(
                            let elem = unsafe {
                                ShapedDebug::new($elems::SHAPE, value.field(mem::offset_of!(Self, $idx)))
                            };
                            tuple.field(&elem);
                        )+
                        tuple.finish()
                    }))
                    .clone_into(if all_clone(&[$($elems::SHAPE),+]) {
                        Some(|src, dst| unsafe {
                            $(
                                let offset = mem::offset_of!(Self, $idx);
                                if let Some(clone_elem) = $elems::VTABLE.clone_into {
                                    clone_elem(src.field(offset), dst.field_uninit_at(offset));
                                }
                            )+
                            dst.assume_init()
                        })
                    } else {
                        None
                    })
                    .build()
            };

            const SHAPE: &'static Shape = &const {
                Shape::builder_for_sized::<Self>()
                    .type_identifier("(⋯)")
                    .ty(Type::Sequence(SequenceType::Tuple(TupleType {
                        fields: &const {
                            [$(
                                Field::builder()
                                    .name(stringify!($idx))
                                    .shape(|| $elems::SHAPE)
                                    .offset(mem::offset_of!(Self, $idx))
                                    .flags(FieldFlags::EXPORTED)
                                    .build()
                            ),+]
                        },
                    })))
                    .build()
            };
        }

        impl_reflect_for_tuple! {
            continue from ($($elems.$idx,)+),
            remaining ($($remaining.$remainingidx,)*)
        }
    };
    // Entry point
    { ($first:ident.$firstidx:tt, $($remaining:ident.$remainingidx:tt,)*) } => {
        impl_reflect_for_tuple! {
            impl ($first.$firstidx,),
            remaining ($($remaining.$remainingidx,)*)
        }
    };
}

impl_reflect_for_tuple! { (T0.0, T1.1, T2.2, T3.3,) }

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn tuples_list_their_elements() {
        let shape = <(u8, String, bool)>::SHAPE;
        assert_eq!(shape.kind(), Kind::Tuple);
        assert_eq!(format!("{shape}"), "(u8, String, bool)");

        let tuple = shape.tuple().unwrap();
        let names: Vec<_> = tuple.fields.iter().map(|field| field.name).collect();
        assert_eq!(names, ["0", "1", "2"]);
        assert_eq!(tuple.fields[1].shape(), String::SHAPE);
    }

    #[test]
    fn tuples_debug_format_like_rust_tuples() {
        let pair = (1_u8, "two");
        let rendered = format!("{:?}", unsafe {
            ShapedDebug::new(<(u8, &str)>::SHAPE, PtrConst::new(&raw const pair))
        });
        assert_eq!(rendered, r#"(1, "two")"#);

        let single = (5_i32,);
        let rendered = format!("{:?}", unsafe {
            ShapedDebug::new(<(i32,)>::SHAPE, PtrConst::new(&raw const single))
        });
        assert_eq!(rendered, "(5,)");
    }

    #[test]
    fn tuples_clone_only_when_every_element_does() {
        assert!(<(u8, String)>::SHAPE.vtable.is_clone());
        assert!(!<(u8, &mut u8)>::SHAPE.vtable.is_clone());
    }
}
