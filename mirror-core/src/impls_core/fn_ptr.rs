use core::fmt;

use crate::{
    ArgCursor, FunctionPointerDef, PointerType, Reflect, Shape, Type, ValueVTable, shape_fns,
};

#[inline(always)]
fn write_fn_type_name(
    f: &mut fmt::Formatter<'_>,
    params: &[&'static Shape],
    ret_type: &'static Shape,
) -> fmt::Result {
    super::write_type_name_list(f, "fn(", ", ", ")", params)?;
    if !ret_type.is_type::<()>() {
        write!(f, " -> {ret_type}")?;
    }
    Ok(())
}

macro_rules! impl_reflect_for_fn_ptr {
    // Used to implement the next bigger `fn` type, by taking the next typename out of `remaining`,
    // if it exists.
    {
        continue from fn($($args:ident),*) -> R,
        remaining ()
    } => {};
    {
        continue from fn($($args:ident),*) -> R,
        remaining ($next:ident $(, $remaining:ident)*)
    } => {
        impl_reflect_for_fn_ptr! {
            impl fn($($args,)* $next) -> R,
            remaining ($($remaining),*)
        }
    };
    // Actually generate the trait implementation, and keep the remaining possible arguments around
    {
        impl fn($($args:ident),*) -> R,
        remaining ($($remaining:ident),*)
    } => {
        unsafe impl<'a, $($args,)* R> Reflect<'a> for fn($($args),*) -> R
        where
            $($args: Reflect<'a>,)*
            R: Reflect<'a>,
        {
            const VTABLE: &'static ValueVTable = &const {
                ValueVTable::builder::<Self>()
                    .type_name(|f| write_fn_type_name(f, &[$($args::SHAPE),*], R::SHAPE))
                    .debug(Some(|data, f| fmt::Debug::fmt(unsafe { data.get::<Self>() }, f)))
                    .clone_into(Some(|src, dst| unsafe { dst.put(src.read::<Self>()) }))
                    .build()
            };

            const SHAPE: &'static Shape = &const {
                Shape::builder_for_sized::<Self>()
                    .type_identifier("fn")
                    .ty(Type::Pointer(PointerType::Function(FunctionPointerDef {
                        parameters: &const {
                            shape_fns([$((|| $args::SHAPE) as fn() -> &'static Shape),*])
                        },
                        return_type: || R::SHAPE,
                        call: |func, args, out| unsafe {
                            let func = func.read::<Self>();
                            #[allow(unused_mut, unused_variables)]
                            let mut args = ArgCursor::new(args);
                            out.put(func($(args.take::<$args>()),*))
                        },
                    })))
                    .build()
            };
        }

        impl_reflect_for_fn_ptr! {
            continue from fn($($args),*) -> R,
            remaining ($($remaining),*)
        }
    };
    // Entry point
    { fn($($args:ident),*) -> R } => {
        impl_reflect_for_fn_ptr! {
            impl fn() -> R,
            remaining ($($args),*)
        }
    };
}

impl_reflect_for_fn_ptr! { fn(A0, A1, A2, A3, A4, A5) -> R }
