use alloc::vec::Vec;
use core::{alloc::Layout, fmt, mem::ManuallyDrop};

use mirror_core::{
    Kind, PtrConst, PtrMut, PtrUninit, Reflect, Shape, ShapedDebug, allocate_layout,
};
use owo_colors::OwoColorize;

use crate::ReflectError;

/// An owned value of any reflected type, tagged with its shape.
///
/// Values are what callers hand to [`Caller`](crate::Caller) and
/// [`Reflector`](crate::Reflector), and what calls hand back.
///
/// ```
/// use mirror::{Kind, Value};
///
/// let value = Value::new(36_i32);
/// assert_eq!(value.kind(), Kind::I32);
/// assert_eq!(value.get::<i32>().unwrap(), &36);
/// assert!(value.get::<u32>().is_err());
/// ```
pub struct Value {
    data: PtrMut<'static>,
    shape: &'static Shape,
}

impl Value {
    /// Moves `value` to the heap.
    pub fn new<T: Reflect<'static>>(value: T) -> Self {
        let data = unsafe { allocate_layout(Layout::new::<T>()).put(value) };
        Self {
            data,
            shape: T::SHAPE,
        }
    }

    /// The exact type of the held value
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// The coarse category of the held value
    #[inline]
    pub fn kind(&self) -> Kind {
        self.shape.kind()
    }

    /// Whether the held value is a `T`
    #[inline]
    pub fn is<T: Reflect<'static>>(&self) -> bool {
        self.shape.is_type::<T>()
    }

    /// Borrows the held value as a `T`
    pub fn get<T: Reflect<'static>>(&self) -> Result<&T, ReflectError> {
        self.expect_shape::<T>()?;
        Ok(unsafe { self.data.get::<T>() })
    }

    /// Takes the held value out as a `T`
    pub fn take<T: Reflect<'static>>(self) -> Result<T, ReflectError> {
        self.expect_shape::<T>()?;
        let (data, shape) = self.into_raw();
        unsafe {
            let value = data.read::<T>();
            release(shape, data.as_uninit());
            Ok(value)
        }
    }

    /// Clones the held value through its shape's vtable.
    pub fn try_clone(&self) -> Result<Value, ReflectError> {
        let Some(clone_into) = self.shape.vtable.clone_into else {
            return Err(ReflectError::NotCloneable { shape: self.shape });
        };
        let target = allocate_layout(layout_of(self.shape));
        let data = unsafe { clone_into(self.data.as_const(), target) };
        Ok(Self {
            data,
            shape: self.shape,
        })
    }

    /// Gives up ownership of the heap storage without dropping the value.
    ///
    /// Turn the pair back into a value with [`Value::from_raw`].
    pub fn into_raw(self) -> (PtrMut<'static>, &'static Shape) {
        let this = ManuallyDrop::new(self);
        (this.data, this.shape)
    }

    /// Takes ownership of heap storage holding a value of `shape`.
    ///
    /// # Safety
    ///
    /// `data` must point to an initialized value of `shape`, stored in memory
    /// obtained from [`allocate_layout`] with the shape's layout. Nothing else
    /// may own that value.
    pub unsafe fn from_raw(data: PtrMut<'static>, shape: &'static Shape) -> Self {
        Self { data, shape }
    }

    pub(crate) fn as_const(&self) -> PtrConst<'static> {
        self.data.as_const()
    }

    fn expect_shape<T: Reflect<'static>>(&self) -> Result<(), ReflectError> {
        if self.is::<T>() {
            Ok(())
        } else {
            Err(ReflectError::WrongShape {
                expected: T::SHAPE,
                actual: self.shape,
            })
        }
    }

    /// Turns this value into one of exactly `target`, for storage in a slot
    /// of that type.
    ///
    /// Newtypes with a `pub` field are interchangeable with what they wrap,
    /// and the target's `try_from` gets a chance to convert anything else.
    pub(crate) fn assign_to(self, target: &'static Shape) -> Result<Value, ReflectError> {
        if self.shape == target {
            return Ok(self);
        }

        let source = self.shape.transparent_base();
        let base = target.transparent_base();
        if source == base {
            log::trace!(
                "Reinterpreting {} as {} (both are {})",
                self.shape.yellow(),
                target.blue(),
                base
            );
            let (data, _) = self.into_raw();
            return Ok(Self {
                data,
                shape: target,
            });
        }

        let converter = if target.vtable.try_from.is_some() {
            target
        } else {
            base
        };
        if let Some(try_from) = converter.vtable.try_from {
            let storage = allocate_layout(layout_of(converter));
            match unsafe { try_from(self.as_const(), source, storage) } {
                Ok(data) => {
                    log::trace!(
                        "Converted {} into {}",
                        self.shape.yellow(),
                        converter.blue()
                    );
                    return Ok(Self {
                        data,
                        shape: target,
                    });
                }
                Err(err) => {
                    log::trace!(
                        "{} refused {}: {err}",
                        converter.blue(),
                        self.shape.yellow()
                    );
                    unsafe { release(converter, storage) };
                }
            }
        }

        Err(ReflectError::Unassignable {
            expected: target,
            actual: self.shape,
        })
    }

    /// Drops whatever `slot` holds and moves this value in its place.
    ///
    /// # Safety
    ///
    /// `slot` must point to an initialized, writable value of exactly this
    /// value's shape.
    pub(crate) unsafe fn replace(self, slot: PtrMut<'_>) {
        unsafe {
            let slot = match self.shape.vtable.drop_in_place {
                Some(drop_fn) => drop_fn(slot),
                None => slot.as_uninit(),
            };
            let (data, shape) = self.into_raw();
            // Moving out of storage that is freed right after, never dropped
            let _ = slot.copy_from(data.as_const(), shape);
            release(shape, data.as_uninit());
        }
    }

    /// Splits a return value into outputs: nothing for `()`, one per element
    /// for tuples, and the value itself otherwise.
    pub(crate) fn into_outputs(self) -> Vec<Value> {
        let Some(tuple) = self.shape.tuple() else {
            return alloc::vec![self];
        };
        if tuple.fields.is_empty() {
            return Vec::new();
        }

        let (data, shape) = self.into_raw();
        let outputs = tuple
            .fields
            .iter()
            .map(|field| {
                let field_shape = field.shape();
                let storage = allocate_layout(layout_of(field_shape));
                unsafe {
                    let element = data.as_const().field(field.offset);
                    let _ = storage.copy_from(element, field_shape);
                    Value::from_raw(storage.assume_init(), field_shape)
                }
            })
            .collect();
        // Every element moved out: only the storage is left
        unsafe { release(shape, data.as_uninit()) };
        outputs
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        unsafe {
            if let Some(drop_fn) = self.shape.vtable.drop_in_place {
                drop_fn(self.data);
            }
            release(self.shape, self.data.as_uninit());
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&unsafe { ShapedDebug::new(self.shape, self.as_const()) }, f)
    }
}

/// Values, and the elements of tuples they hold, are always sized.
pub(crate) fn layout_of(shape: &'static Shape) -> Layout {
    match shape.layout.sized_layout() {
        Ok(layout) => layout,
        Err(_) => unreachable!("{shape} is unsized and cannot be held by a value"),
    }
}

/// Frees storage obtained from [`allocate_layout`], without dropping what it holds.
///
/// # Safety
///
/// `storage` must have been allocated for `shape` and not freed yet.
pub(crate) unsafe fn release(shape: &'static Shape, storage: PtrUninit<'_>) {
    let _ = unsafe { shape.deallocate_uninit(storage) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec};

    #[test]
    fn values_round_trip_through_the_heap() {
        let value = Value::new(String::from("hello"));
        assert!(value.is::<String>());
        assert_eq!(value.kind(), Kind::String);
        assert_eq!(alloc::format!("{value:?}"), r#""hello""#);
        assert_eq!(value.take::<String>().unwrap(), "hello");
    }

    #[test]
    fn asking_for_another_type_fails() {
        let value = Value::new(5_i32);
        let err = value.get::<u32>().unwrap_err();
        assert_eq!(
            err,
            ReflectError::WrongShape {
                expected: u32::SHAPE,
                actual: i32::SHAPE,
            }
        );
        assert!(value.take::<i64>().is_err());
    }

    #[test]
    fn zero_sized_values_work() {
        let value = Value::new(());
        assert_eq!(value.kind(), Kind::Unit);
        value.take::<()>().unwrap();
    }

    #[test]
    fn clones_are_independent() {
        let value = Value::new(vec![1_u8, 2, 3]);
        let copy = value.try_clone().unwrap();
        drop(value);
        assert_eq!(copy.get::<Vec<u8>>().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn every_value_is_dropped_exactly_once() {
        use core::sync::atomic::{AtomicUsize, Ordering};

        static DROPS: AtomicUsize = AtomicUsize::new(0);

        crate::reflect! {
            #[derive(Clone)]
            pub struct Tracked {
                pub id: u32,
            }
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }
        let drops = || DROPS.load(Ordering::SeqCst);

        let value = Value::new(Tracked { id: 1 });
        let copy = value.try_clone().unwrap();
        drop(value);
        drop(copy);
        assert_eq!(drops(), 2);

        let taken = Value::new(Tracked { id: 2 }).take::<Tracked>().unwrap();
        assert_eq!(drops(), 2);
        drop(taken);
        assert_eq!(drops(), 3);

        // splitting moves the elements out of the tuple
        let outputs = Value::new((Tracked { id: 3 }, Tracked { id: 4 })).into_outputs();
        assert_eq!(drops(), 3);
        drop(outputs);
        assert_eq!(drops(), 5);

        // replacing drops only what was in the slot
        let mut slot = Tracked { id: 5 };
        unsafe { Value::new(Tracked { id: 6 }).replace(PtrMut::new(&raw mut slot)) };
        assert_eq!(drops(), 6);
        assert_eq!(slot.id, 6);
    }

    #[test]
    fn tuples_split_into_their_elements() {
        let outputs = Value::new((1_u8, String::from("two"), 3.0_f64)).into_outputs();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].get::<u8>().unwrap(), &1);
        assert_eq!(outputs[1].get::<String>().unwrap(), "two");
        assert_eq!(outputs[2].get::<f64>().unwrap(), &3.0);

        assert!(Value::new(()).into_outputs().is_empty());
        assert_eq!(Value::new((7_u8,)).into_outputs().len(), 1);

        // only tuples are split
        let outputs = Value::new(vec![1_u8, 2]).into_outputs();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn str_assigns_to_string() {
        let value = Value::new("text").assign_to(String::SHAPE).unwrap();
        assert_eq!(value.get::<String>().unwrap(), "text");

        let err = Value::new(String::new())
            .assign_to(<&str>::SHAPE)
            .unwrap_err();
        assert!(matches!(err, ReflectError::Unassignable { .. }));
    }

    #[test]
    fn replacing_drops_the_old_value() {
        let mut slot = String::from("old");
        unsafe { Value::new(String::from("new")).replace(PtrMut::new(&raw mut slot)) };
        assert_eq!(slot, "new");
    }
}
