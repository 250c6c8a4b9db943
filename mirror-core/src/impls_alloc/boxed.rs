use alloc::boxed::Box;

use crate::*;

unsafe impl<'a, T: Reflect<'a>> Reflect<'a> for Box<T> {
    const VTABLE: &'static ValueVTable = &const {
        ValueVTable::builder::<Self>()
            .type_name(|f| {
                write!(f, "Box<")?;
                (T::VTABLE.type_name)(f)?;
                write!(f, ">")
            })
            .debug(Some(|value, f| {
                let boxed = unsafe { value.get::<Self>() };
                core::fmt::Debug::fmt(
                    &unsafe { ShapedDebug::new(T::SHAPE, PtrConst::new(&raw const **boxed)) },
                    f,
                )
            }))
            .clone_into(if T::VTABLE.clone_into.is_some() {
                Some(|src, dst| unsafe {
                    let Some(clone_inner) = T::VTABLE.clone_into else {
                        unreachable!()
                    };
                    let boxed = src.get::<Self>();
                    let mut slot = Box::<T>::new_uninit();
                    clone_inner(
                        PtrConst::new(&raw const **boxed),
                        PtrUninit::new(slot.as_mut_ptr()),
                    );
                    dst.put(slot.assume_init())
                })
            } else {
                None
            })
            .build()
    };

    const SHAPE: &'static Shape = &const {
        Shape::builder_for_sized::<Self>()
            .type_identifier("Box")
            .def(Def::SmartPointer(SmartPointerDef {
                pointee: || T::SHAPE,
                known: Some(KnownSmartPointer::Box),
                borrow_mut: |mut this| unsafe {
                    let boxed = this.as_mut::<Self>();
                    PtrMut::new(&raw mut **boxed)
                },
            }))
            .ty(Type::User(UserType::Opaque))
            .build()
    };
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn boxes_step_through_to_their_pointee() {
        let mut boxed = Box::new(41_u32);
        let step = <Box<u32>>::SHAPE.deref_target().unwrap();
        assert_eq!(step.target, u32::SHAPE);
        assert!(step.mutable);

        let pointee = unsafe { (step.deref)(PtrMut::new(&raw mut boxed)) };
        unsafe { *pointee.as_mut_byte_ptr().cast::<u32>() += 1 };
        assert_eq!(*boxed, 42);
        assert_eq!(<Box<u32>>::SHAPE.kind(), Kind::Pointer);
    }
}
