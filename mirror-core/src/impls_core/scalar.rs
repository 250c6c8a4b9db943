use crate::value_vtable;
use crate::*;

unsafe impl Reflect<'_> for () {
    const VTABLE: &'static ValueVTable = &const { value_vtable!((), |f| write!(f, "()")) };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("()")
            .def(Def::Scalar(ScalarAffinity::Empty))
            .ty(Type::Sequence(SequenceType::Tuple(TupleType { fields: &[] })))
            .build()
    };
}

unsafe impl Reflect<'_> for char {
    const VTABLE: &'static ValueVTable = &const { value_vtable!(char, |f| write!(f, "char")) };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("char")
            .def(Def::Scalar(ScalarAffinity::Char))
            .ty(Type::Primitive(PrimitiveType::Textual(TextualType::Char)))
            .build()
    };
}

unsafe impl Reflect<'_> for str {
    // `str` values only ever sit behind a reference, whose vtable does the
    // actual work.
    const VTABLE: &'static ValueVTable = &const {
        ValueVTable {
            type_name: |f| write!(f, "str"),
            drop_in_place: None,
            debug: Some(|data, f| {
                // wide pointee: `data` points at the `&str`
                let data = unsafe { data.get::<&str>() };
                core::fmt::Debug::fmt(*data, f)
            }),
            clone_into: None,
            try_from: None,
        }
    };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_unsized::<Self>()
            .type_identifier("str")
            .ty(Type::Primitive(PrimitiveType::Textual(TextualType::Str)))
            .def(Def::Scalar(ScalarAffinity::String))
            .build()
    };
}

unsafe impl Reflect<'_> for bool {
    const VTABLE: &'static ValueVTable = &const { value_vtable!(bool, |f| write!(f, "bool")) };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("bool")
            .def(Def::Scalar(ScalarAffinity::Boolean))
            .ty(Type::Primitive(PrimitiveType::Boolean))
            .build()
    };
}

macro_rules! impl_reflect_for_integer {
    ($type:ty, signed: $signed:expr, pointer_sized: $pointer_sized:expr) => {
        unsafe impl Reflect<'_> for $type {
            const VTABLE: &'static ValueVTable =
                &const { value_vtable!($type, |f| f.write_str(stringify!($type))) };

            const SHAPE: &'static Shape = &const {
                Shape::builder_for_sized::<Self>()
                    .type_identifier(stringify!($type))
                    .def(Def::Scalar(ScalarAffinity::Number))
                    .ty(Type::Primitive(PrimitiveType::Numeric(NumericType::Integer {
                        signed: $signed,
                        pointer_sized: $pointer_sized,
                    })))
                    .build()
            };
        }
    };
}

impl_reflect_for_integer!(u8, signed: false, pointer_sized: false);
impl_reflect_for_integer!(u16, signed: false, pointer_sized: false);
impl_reflect_for_integer!(u32, signed: false, pointer_sized: false);
impl_reflect_for_integer!(u64, signed: false, pointer_sized: false);
impl_reflect_for_integer!(u128, signed: false, pointer_sized: false);
impl_reflect_for_integer!(usize, signed: false, pointer_sized: true);
impl_reflect_for_integer!(i8, signed: true, pointer_sized: false);
impl_reflect_for_integer!(i16, signed: true, pointer_sized: false);
impl_reflect_for_integer!(i32, signed: true, pointer_sized: false);
impl_reflect_for_integer!(i64, signed: true, pointer_sized: false);
impl_reflect_for_integer!(i128, signed: true, pointer_sized: false);
impl_reflect_for_integer!(isize, signed: true, pointer_sized: true);

macro_rules! impl_reflect_for_float {
    ($type:ty) => {
        unsafe impl Reflect<'_> for $type {
            const VTABLE: &'static ValueVTable =
                &const { value_vtable!($type, |f| f.write_str(stringify!($type))) };

            const SHAPE: &'static Shape = &const {
                Shape::builder_for_sized::<Self>()
                    .type_identifier(stringify!($type))
                    .def(Def::Scalar(ScalarAffinity::Number))
                    .ty(Type::Primitive(PrimitiveType::Numeric(NumericType::Float)))
                    .build()
            };
        }
    };
}

impl_reflect_for_float!(f32);
impl_reflect_for_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_kinds_are_width_specific() {
        assert_eq!(u8::SHAPE.kind(), Kind::U8);
        assert_eq!(i32::SHAPE.kind(), Kind::I32);
        assert_eq!(i128::SHAPE.kind(), Kind::I128);
        assert_eq!(f64::SHAPE.kind(), Kind::F64);
        // same layout as one of the fixed widths, but a kind of their own
        assert_eq!(usize::SHAPE.kind(), Kind::Usize);
        assert_eq!(isize::SHAPE.kind(), Kind::Isize);
    }

    #[test]
    fn unit_is_an_empty_tuple() {
        assert_eq!(<()>::SHAPE.kind(), Kind::Unit);
        assert_eq!(<()>::SHAPE.tuple().map(|tuple| tuple.fields.len()), Some(0));
    }

    #[test]
    fn scalars_print_their_names() {
        assert_eq!(format!("{}", u16::SHAPE), "u16");
        assert_eq!(format!("{}", char::SHAPE), "char");
        assert_eq!(format!("{}", str::SHAPE), "str");
    }
}
