//! Matching argument lists to parameter lists, and making the erased call.

use alloc::{format, vec::Vec};

use mirror_core::{PtrMut, PtrUninit, Shape, allocate_layout};
use owo_colors::OwoColorize;

use crate::value::{layout_of, release};
use crate::{Callee, ReflectError, Value};

/// Values keyed by their exact shape. A later insert of the same shape
/// replaces the earlier value.
#[derive(Default)]
pub(crate) struct TypeEntries {
    entries: Vec<Value>,
}

impl TypeEntries {
    pub(crate) fn insert(&mut self, value: Value) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.shape() == value.shape())
        {
            Some(entry) => {
                log::debug!("A later {} replaces {:?}", value.shape().yellow(), entry);
                *entry = value;
            }
            None => self.entries.push(value),
        }
    }

    pub(crate) fn get(&self, shape: &'static Shape) -> Option<&Value> {
        self.entries.iter().find(|entry| entry.shape() == shape)
    }

    pub(crate) fn remove(&mut self, shape: &'static Shape) -> Option<Value> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.shape() == shape)?;
        Some(self.entries.swap_remove(index))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_arity(
    callee: Callee,
    parameters: &[fn() -> &'static Shape],
    args: &[Value],
) -> Result<(), ReflectError> {
    if parameters.len() == args.len() {
        Ok(())
    } else {
        Err(ReflectError::ArityMismatch {
            callee,
            expected: parameters.len(),
            actual: args.len(),
        })
    }
}

/// Binds `args[i]` to parameter `i`. Kinds must agree slot by slot; each
/// argument is then assigned to its parameter's exact type.
pub(crate) fn positional(
    callee: Callee,
    parameters: &[fn() -> &'static Shape],
    args: Vec<Value>,
) -> Result<Vec<Value>, ReflectError> {
    check_arity(callee, parameters, &args)?;

    parameters
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (parameter, arg))| {
            let expected = parameter();
            if expected.kind() != arg.kind() {
                return Err(ReflectError::KindMismatch {
                    callee,
                    index,
                    expected: expected.kind(),
                    actual: arg.kind(),
                    value: format!("{arg:?}"),
                });
            }
            arg.assign_to(expected)
        })
        .collect()
}

/// Binds every parameter to the argument of its exact type, wherever that
/// argument sits in `args`.
///
/// Of several arguments sharing a type, the last one wins. An argument that
/// feeds more than one parameter is cloned for all but the last of them.
pub(crate) fn by_type(
    callee: Callee,
    parameters: &[fn() -> &'static Shape],
    args: Vec<Value>,
) -> Result<Vec<Value>, ReflectError> {
    check_arity(callee, parameters, &args)?;

    let mut provided = TypeEntries::default();
    for arg in args {
        provided.insert(arg);
    }

    let shapes: Vec<&'static Shape> = parameters.iter().map(|parameter| parameter()).collect();
    let mut bound = Vec::with_capacity(shapes.len());
    for (index, &shape) in shapes.iter().enumerate() {
        let missing = ReflectError::TypeNotProvided {
            callee,
            index,
            missing: shape,
        };
        let value = if shapes[index + 1..].contains(&shape) {
            provided.get(shape).ok_or(missing)?.try_clone()?
        } else {
            provided.remove(shape).ok_or(missing)?
        };
        bound.push(value);
    }
    Ok(bound)
}

/// Makes an erased call with already-bound arguments and splits the return
/// value into outputs.
///
/// `call` receives one pointer per argument and must move every argument
/// out; only their storage is freed afterwards. If `call` panics, the
/// arguments leak rather than risk being dropped twice.
pub(crate) fn invoke<'mem>(
    return_shape: &'static Shape,
    args: Vec<Value>,
    call: impl FnOnce(&[PtrMut<'mem>], PtrUninit<'mem>),
) -> Vec<Value> {
    let raw: Vec<(PtrMut<'static>, &'static Shape)> =
        args.into_iter().map(Value::into_raw).collect();
    let pointers: Vec<PtrMut<'static>> = raw.iter().map(|(data, _)| *data).collect();
    let out = allocate_layout(layout_of(return_shape));

    call(pointers.as_slice(), out);

    for (data, shape) in raw {
        unsafe { release(shape, data.as_uninit()) };
    }
    let output = unsafe { Value::from_raw(out.assume_init(), return_shape) };
    log::trace!("Call returned {output:?}");
    output.into_outputs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use mirror_core::Reflect;

    fn shapes<const N: usize>(shapes: [fn() -> &'static Shape; N]) -> [fn() -> &'static Shape; N] {
        shapes
    }

    #[test]
    fn later_entries_of_a_type_win() {
        let mut entries = TypeEntries::default();
        assert!(entries.is_empty());
        entries.insert(Value::new(1_i32));
        entries.insert(Value::new(String::from("x")));
        entries.insert(Value::new(2_i32));

        assert_eq!(entries.get(i32::SHAPE).unwrap().get::<i32>().unwrap(), &2);
        let removed = entries.remove(String::SHAPE).unwrap();
        assert_eq!(removed.get::<String>().unwrap(), "x");
        assert!(entries.get(String::SHAPE).is_none());
        assert!(!entries.is_empty());
    }

    #[test]
    fn positional_binding_assigns_in_order() {
        let callee = Callee::Function(<fn(String, u8)>::SHAPE);
        let params = shapes([|| String::SHAPE, || u8::SHAPE]);
        let args = alloc::vec![Value::new("a"), Value::new(1_u8)];
        let bound = positional(callee, &params, args).unwrap();
        assert!(bound[0].is::<String>());
        assert!(bound[1].is::<u8>());
    }

    #[test]
    fn type_keyed_binding_reuses_shared_arguments() {
        let callee = Callee::Function(<fn(u8, String, u8)>::SHAPE);
        let params = shapes([|| u8::SHAPE, || String::SHAPE, || u8::SHAPE]);
        let args = alloc::vec![
            Value::new(String::from("s")),
            Value::new(1_u8),
            Value::new(9_u8),
        ];
        let bound = by_type(callee, &params, args).unwrap();
        let rendered: Vec<String> = bound.iter().map(|v| alloc::format!("{v:?}")).collect();
        assert_eq!(rendered, ["9", "\"s\"", "9"]);
    }
}
