use alloc::{boxed::Box, collections::BTreeMap, string::String, string::ToString, vec::Vec};

use mirror_core::{Field, MethodDef, PtrMut, Receiver, Reflect, Shape, StructType};
use owo_colors::OwoColorize;

use crate::bind::{self, TypeEntries};
use crate::{Advisory, Callee, Diagnostics, LogDiagnostics, ReflectError, Value};

/// Fills the fields of a borrowed struct, and calls its methods, from
/// dynamically typed values.
///
/// The target may sit behind any number of references and boxes, and may be
/// wrapped in newtypes: it is resolved on every operation to the struct with
/// named fields at the end of the chain.
///
/// Values are first recorded with [`map`](Reflector::map) (keyed by field
/// name) or [`map_type`](Reflector::map_type) (keyed by type), then written
/// with [`inject`](Reflector::inject) or
/// [`inject_type`](Reflector::inject_type) respectively. Recorded values are
/// kept and cloned into the target on every injection.
///
/// Only `pub` fields are written.
pub struct Reflector<'a> {
    target: PtrMut<'a>,
    shape: &'static Shape,
    names: BTreeMap<String, Value>,
    types: TypeEntries,
    diagnostics: Box<dyn Diagnostics + 'a>,
}

/// The struct a target resolved to
struct Resolved<'a> {
    data: PtrMut<'a>,
    shape: &'static Shape,
    aggregate: &'static StructType,
    mutable: bool,
}

impl Resolved<'_> {
    fn ensure_mutable(&self, operation: &'static str) -> Result<(), ReflectError> {
        if self.mutable {
            Ok(())
        } else {
            Err(ReflectError::Immutable {
                shape: self.shape,
                operation,
            })
        }
    }
}

impl<'a> Reflector<'a> {
    /// Borrows `target` for the lifetime of the reflector.
    pub fn new<'t: 'a, T: Reflect<'t>>(target: &'a mut T) -> Self {
        Self {
            target: PtrMut::new(target as *mut T),
            shape: T::SHAPE,
            names: BTreeMap::new(),
            types: TypeEntries::default(),
            diagnostics: Box::new(LogDiagnostics),
        }
    }

    /// Sends advisories to `diagnostics` instead of the log.
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'a) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Records `value` for the field named `field`, replacing any value
    /// recorded for it before.
    pub fn map<V: Reflect<'static>>(mut self, field: impl Into<String>, value: V) -> Self {
        self.names.insert(field.into(), Value::new(value));
        self
    }

    /// Records `value` for every field of its exact type, replacing any value
    /// of that type recorded before.
    pub fn map_type<V: Reflect<'static>>(mut self, value: V) -> Self {
        self.types.insert(Value::new(value));
        self
    }

    /// The shape of the borrowed target, before resolution
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    fn resolve(&self) -> Result<Resolved<'a>, ReflectError> {
        let mut data = self.target;
        let mut shape = self.shape;
        let mut mutable = true;
        loop {
            if let Some(inner) = shape.newtype_inner() {
                shape = inner;
            } else if let Some(step) = shape.deref_target() {
                log::trace!(
                    "Stepping through {} to {}",
                    shape.yellow(),
                    step.target.blue()
                );
                data = unsafe { (step.deref)(data) };
                mutable &= step.mutable;
                shape = step.target;
            } else {
                break;
            }
        }

        let aggregate = shape
            .aggregate()
            .ok_or(ReflectError::NotAnAggregate { shape: self.shape })?;
        Ok(Resolved {
            data,
            shape,
            aggregate,
            mutable,
        })
    }

    /// Writes every value recorded with [`map`](Reflector::map) into the
    /// `pub` field of the same name.
    ///
    /// A value must have the kind of its field, and is converted to the
    /// field's exact type when needed (see [`Caller::call`](crate::Caller::call)).
    /// Fields are written in declaration order and the first failure stops
    /// the injection: fields written before it keep their new value.
    pub fn inject(&mut self) -> Result<&mut Self, ReflectError> {
        let resolved = self.resolve()?;
        if self.names.is_empty() && !self.types.is_empty() {
            self.diagnostics.advise(&Advisory::OnlyTypeEntries {
                shape: resolved.shape,
            });
        }
        resolved.ensure_mutable("inject fields")?;

        for field in exported_fields(&resolved) {
            let Some(entry) = self.names.get(field.name) else {
                continue;
            };
            let field_shape = field.shape();
            if entry.kind() != field_shape.kind() {
                return Err(ReflectError::FieldKindMismatch {
                    shape: resolved.shape,
                    field: field.name,
                    expected: field_shape.kind(),
                    actual: entry.kind(),
                    value: alloc::format!("{entry:?}"),
                });
            }
            let value = entry.try_clone()?.assign_to(field_shape)?;
            log::debug!(
                "Injecting {value:?} into {}::{}",
                resolved.shape.blue(),
                field.name
            );
            unsafe { value.replace(resolved.data.field(field.offset)) };
        }

        Ok(self)
    }

    /// Writes every value recorded with [`map_type`](Reflector::map_type)
    /// into each `pub` field of exactly its type. Fields without a value of
    /// their type are left alone.
    pub fn inject_type(&mut self) -> Result<&mut Self, ReflectError> {
        let resolved = self.resolve()?;
        if self.types.is_empty() && !self.names.is_empty() {
            self.diagnostics.advise(&Advisory::OnlyNameEntries {
                shape: resolved.shape,
            });
        }
        resolved.ensure_mutable("inject fields")?;

        for field in exported_fields(&resolved) {
            let Some(entry) = self.types.get(field.shape()) else {
                continue;
            };
            let value = entry.try_clone()?;
            log::debug!(
                "Injecting {value:?} into {}::{}",
                resolved.shape.blue(),
                field.name
            );
            unsafe { value.replace(resolved.data.field(field.offset)) };
        }

        Ok(self)
    }

    fn method(&self, name: &str) -> Result<(Resolved<'a>, &'static MethodDef), ReflectError> {
        let resolved = self.resolve()?;
        let Some(method) = resolved.shape.method(name) else {
            return Err(ReflectError::MethodNotFound {
                shape: resolved.shape,
                name: name.to_string(),
            });
        };
        if method.receiver == Receiver::Exclusive {
            resolved.ensure_mutable("call a `&mut self` method")?;
        }
        Ok((resolved, method))
    }

    /// Calls the method exposed under `name`, binding `args[i]` to
    /// parameter `i` the way [`Caller::call`](crate::Caller::call) does.
    pub fn invoke(&mut self, name: &str, args: Vec<Value>) -> Result<Vec<Value>, ReflectError> {
        let (resolved, method) = self.method(name)?;
        let callee = Callee::Method {
            receiver: resolved.shape,
            name: method.name,
        };
        let bound = bind::positional(callee, method.parameters, args)?;
        Ok(call_method(resolved, method, bound))
    }

    /// Calls the method exposed under `name`, binding arguments by type the
    /// way [`Caller::call_type`](crate::Caller::call_type) does.
    pub fn invoke_type(
        &mut self,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, ReflectError> {
        let (resolved, method) = self.method(name)?;
        let callee = Callee::Method {
            receiver: resolved.shape,
            name: method.name,
        };
        let bound = bind::by_type(callee, method.parameters, args)?;
        Ok(call_method(resolved, method, bound))
    }
}

fn exported_fields<'r>(resolved: &'r Resolved<'_>) -> impl Iterator<Item = &'static Field> + 'r {
    resolved.aggregate.fields.iter().filter(|field| {
        if !field.is_exported() {
            log::trace!(
                "Skipping {}::{}, it is not pub",
                resolved.shape.blue(),
                field.name
            );
        }
        field.is_exported()
    })
}

fn call_method(resolved: Resolved<'_>, method: &'static MethodDef, args: Vec<Value>) -> Vec<Value> {
    log::debug!(
        "Invoking {}::{} with {} argument(s)",
        resolved.shape.blue(),
        method.name,
        args.len()
    );
    let receiver = resolved.data;
    bind::invoke(method.return_shape(), args, |args, out| unsafe {
        (method.call)(receiver, args, out);
    })
}
