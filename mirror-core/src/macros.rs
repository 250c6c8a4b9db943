use crate::{Field, PtrMut, PtrUninit, Reflect};

#[doc(hidden)]
pub const fn __fields<const N: usize>(fields: [Field; N]) -> [Field; N] {
    fields
}

/// Writes a method's return value into its output slot.
///
/// The `'static` bound is what keeps borrowed returns (`&str` tied to `self`)
/// out of method tables: they would outlive the borrow of the receiver.
///
/// # Safety
///
/// `out` must be valid for writes of `R`.
#[doc(hidden)]
pub unsafe fn __put_output<'mem, R: Reflect<'static>>(out: PtrUninit<'mem>, value: R) -> PtrMut<'mem> {
    unsafe { out.put(value) }
}

/// Creates a `ValueVTable` for a given type.
///
/// `Debug` and `Clone` are picked up when the type implements them.
///
/// # Arguments
///
/// * `$type_name:ty` - The type for which to create the `ValueVTable`.
/// * `$type_name_fn:expr` - A function that writes the type name to a formatter.
///
/// # Example
///
/// ```
/// use mirror_core::value_vtable;
/// use core::fmt::Formatter;
///
/// let vtable = value_vtable!(String, |f: &mut Formatter<'_>| write!(f, "String"));
/// assert!(vtable.debug.is_some());
/// ```
///
/// This cannot be used for a generic type because the `impls!` thing depends on type bounds.
#[macro_export]
macro_rules! value_vtable {
    ($type_name:ty, $type_name_fn:expr) => {
        const {
            $crate::ValueVTable::builder::<$type_name>()
                .type_name($type_name_fn)
                .debug(if $crate::spez::impls!($type_name: core::fmt::Debug) {
                    Some(|data, f| {
                        use $crate::spez::*;
                        let data = unsafe { data.get::<$type_name>() };
                        (&&Spez(data)).spez_debug(f)
                    })
                } else {
                    None
                })
                .clone_into(if $crate::spez::impls!($type_name: core::clone::Clone) {
                    Some(|src, dst| unsafe {
                        use $crate::spez::*;
                        let src = src.get::<$type_name>();
                        (&&Spez(src)).spez_clone_into(dst)
                    })
                } else {
                    None
                })
                .build()
        }
    };
}

/// Declares a struct and implements [`Reflect`](crate::Reflect) for it.
///
/// Named-field structs and single-field tuple structs (newtypes) are
/// supported. Fields declared with any `pub` visibility are marked
/// [`EXPORTED`](crate::FieldFlags::EXPORTED); the others are visible to
/// reflection but never written by it.
///
/// An optional `impl { ... }` block lists the methods to expose for
/// invocation by name. Each entry is a signature ending in `;`, taking `&self`
/// or `&mut self`; the method itself is written in a regular `impl` block.
/// Exposed methods must return `'static` values.
///
/// ```
/// use mirror_core::{reflect, Receiver, Reflect};
///
/// reflect! {
///     #[derive(Debug, Clone)]
///     pub struct Counter {
///         pub step: u32,
///         total: u32,
///     }
///     impl {
///         fn bump(&mut self, times: u32) -> u32;
///         fn total(&self) -> u32;
///     }
/// }
///
/// impl Counter {
///     fn bump(&mut self, times: u32) -> u32 {
///         self.total += self.step * times;
///         self.total
///     }
///
///     fn total(&self) -> u32 {
///         self.total
///     }
/// }
///
/// let bump = Counter::SHAPE.method("bump").unwrap();
/// assert_eq!(bump.receiver, Receiver::Exclusive);
/// assert_eq!(bump.arity(), 1);
/// ```
#[macro_export]
macro_rules! reflect {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
        $(impl { $($methods:tt)* })?
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $(
                $(#[$field_attr])*
                $field_vis $field: $field_ty,
            )*
        }

        unsafe impl<'__mirror> $crate::Reflect<'__mirror> for $name {
            const VTABLE: &'static $crate::ValueVTable =
                &$crate::value_vtable!($name, |f| f.write_str(stringify!($name)));

            const SHAPE: &'static $crate::Shape = &const {
                $crate::Shape::builder_for_sized::<Self>()
                    .type_identifier(stringify!($name))
                    .ty($crate::Type::User($crate::UserType::Struct(
                        $crate::StructType::builder()
                            .kind($crate::StructKind::Struct)
                            .fields(&const {
                                $crate::__fields([$(
                                    $crate::Field::builder()
                                        .name(stringify!($field))
                                        .shape(|| <$field_ty as $crate::Reflect>::SHAPE)
                                        .offset(::core::mem::offset_of!($name, $field))
                                        .flags($crate::FieldFlags::for_visibility(stringify!($field_vis)))
                                        .build()
                                ),*])
                            })
                            .build(),
                    )))
                    .methods($crate::__reflect_methods!($name; $($($methods)*)?))
                    .build()
            };
        }
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident (
            $(#[$field_attr:meta])*
            $field_vis:vis $field_ty:ty $(,)?
        );
        $(impl { $($methods:tt)* })?
    ) => {
        $(#[$attr])*
        $vis struct $name($(#[$field_attr])* $field_vis $field_ty);

        unsafe impl<'__mirror> $crate::Reflect<'__mirror> for $name {
            const VTABLE: &'static $crate::ValueVTable =
                &$crate::value_vtable!($name, |f| f.write_str(stringify!($name)));

            const SHAPE: &'static $crate::Shape = &const {
                $crate::Shape::builder_for_sized::<Self>()
                    .type_identifier(stringify!($name))
                    .ty($crate::Type::User($crate::UserType::Struct(
                        $crate::StructType::builder()
                            .kind($crate::StructKind::TupleStruct)
                            .fields(&const {
                                $crate::__fields([
                                    $crate::Field::builder()
                                        .name("0")
                                        .shape(|| <$field_ty as $crate::Reflect>::SHAPE)
                                        .offset(::core::mem::offset_of!($name, 0))
                                        .flags($crate::FieldFlags::for_visibility(stringify!($field_vis)))
                                        .build()
                                ])
                            })
                            .build(),
                    )))
                    .methods($crate::__reflect_methods!($name; $($($methods)*)?))
                    .build()
            };
        }
    };
}

/// Builds the method table for `reflect!`, one signature at a time.
#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_methods {
    (@munch $recv:ty; [$($done:expr,)*];) => {
        [$($done,)*]
    };

    (@munch $recv:ty; [$($done:expr,)*];
        fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::__reflect_methods!(@munch $recv; [
            $($done,)*
            $crate::MethodDef {
                name: stringify!($method),
                receiver: $crate::Receiver::Shared,
                parameters: &const {
                    $crate::shape_fns([$(
                        (|| <$arg_ty as $crate::Reflect>::SHAPE) as fn() -> &'static $crate::Shape
                    ),*])
                },
                return_type: || <$crate::__ret_ty!($($ret)?) as $crate::Reflect>::SHAPE,
                call: |receiver, args, out| unsafe {
                    let this = receiver.get::<$recv>();
                    #[allow(unused_mut, unused_variables)]
                    let mut args = $crate::ArgCursor::new(args);
                    $(let $arg = args.take::<$arg_ty>();)*
                    $crate::__put_output::<$crate::__ret_ty!($($ret)?)>(
                        out,
                        <$recv>::$method(this $(, $arg)*),
                    )
                },
            },
        ]; $($rest)*)
    };

    (@munch $recv:ty; [$($done:expr,)*];
        fn $method:ident(&mut self $(, $arg:ident : $arg_ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::__reflect_methods!(@munch $recv; [
            $($done,)*
            $crate::MethodDef {
                name: stringify!($method),
                receiver: $crate::Receiver::Exclusive,
                parameters: &const {
                    $crate::shape_fns([$(
                        (|| <$arg_ty as $crate::Reflect>::SHAPE) as fn() -> &'static $crate::Shape
                    ),*])
                },
                return_type: || <$crate::__ret_ty!($($ret)?) as $crate::Reflect>::SHAPE,
                call: |receiver, args, out| unsafe {
                    let mut receiver = receiver;
                    let this = receiver.as_mut::<$recv>();
                    #[allow(unused_mut, unused_variables)]
                    let mut args = $crate::ArgCursor::new(args);
                    $(let $arg = args.take::<$arg_ty>();)*
                    $crate::__put_output::<$crate::__ret_ty!($($ret)?)>(
                        out,
                        <$recv>::$method(this $(, $arg)*),
                    )
                },
            },
        ]; $($rest)*)
    };

    ($recv:ty;) => {
        &[]
    };

    ($recv:ty; $($methods:tt)+) => {
        &const { $crate::__reflect_methods!(@munch $recv; []; $($methods)+) }
    };
}

/// The return type of a signature, `()` when omitted.
#[doc(hidden)]
#[macro_export]
macro_rules! __ret_ty {
    () => {
        ()
    };
    ($ret:ty) => {
        $ret
    };
}
