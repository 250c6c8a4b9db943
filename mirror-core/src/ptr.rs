//! Opaque pointers
//!
//! Type-erased pointer helpers for working with reflected values

use core::{marker::PhantomData, ptr::NonNull};

use crate::{Shape, UnsizedError};

/// A type-erased pointer to an uninitialized value
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct PtrUninit<'mem>(*mut u8, PhantomData<&'mem mut ()>);

impl<'mem> PtrUninit<'mem> {
    /// Create a new opaque pointer from a mutable pointer
    ///
    /// This is safe because it's generic over T
    #[inline]
    pub fn new<T>(ptr: *mut T) -> Self {
        Self(ptr as *mut u8, PhantomData)
    }

    /// Creates a new opaque pointer from a reference to a [`core::mem::MaybeUninit`]
    ///
    /// The pointer will point to the potentially uninitialized contents
    #[inline]
    pub fn from_maybe_uninit<T>(borrow: &'mem mut core::mem::MaybeUninit<T>) -> Self {
        Self(borrow.as_mut_ptr() as *mut u8, PhantomData)
    }

    /// Copies a value of the given shape from `src` into this location.
    ///
    /// # Safety
    ///
    /// - `src` must point to an initialized value of `shape`
    /// - This pointer must be valid for writes of that many bytes and properly aligned
    /// - The regions may not overlap
    /// - Ownership moves: the source must not be dropped afterwards
    #[inline]
    pub unsafe fn copy_from(
        self,
        src: PtrConst<'_>,
        shape: &'static Shape,
    ) -> Result<PtrMut<'mem>, UnsizedError> {
        let layout = shape.layout.sized_layout()?;
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_byte_ptr(), self.0, layout.size());
            Ok(self.assume_init())
        }
    }

    /// Assumes the pointer is initialized and returns a [`PtrMut`]
    ///
    /// # Safety
    ///
    /// The pointer must actually be pointing to initialized memory of the correct type.
    #[inline]
    pub unsafe fn assume_init(self) -> PtrMut<'mem> {
        let ptr = unsafe { NonNull::new_unchecked(self.0) };
        PtrMut(ptr, PhantomData)
    }

    /// Write a value to this location and convert to an initialized pointer
    ///
    /// # Safety
    ///
    /// The pointer must be properly aligned for T and point to allocated memory
    /// that can be safely written to.
    #[inline]
    pub unsafe fn put<T>(self, value: T) -> PtrMut<'mem> {
        unsafe {
            core::ptr::write(self.0 as *mut T, value);
            self.assume_init()
        }
    }

    /// Returns the underlying raw pointer as a byte pointer
    #[inline]
    pub fn as_mut_byte_ptr(self) -> *mut u8 {
        self.0
    }

    /// Returns a pointer with the given offset added
    ///
    /// # Safety
    ///
    /// Offset is within the bounds of the allocated memory
    #[inline]
    pub unsafe fn field_uninit_at(self, offset: usize) -> PtrUninit<'mem> {
        PtrUninit(unsafe { self.0.byte_add(offset) }, PhantomData)
    }
}

/// A type-erased read-only pointer to an initialized value.
///
/// Cannot be null. May be dangling (for ZSTs)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PtrConst<'mem>(NonNull<u8>, PhantomData<&'mem ()>);

impl<'mem> PtrConst<'mem> {
    /// Create a new opaque const pointer from a raw pointer
    ///
    /// The pointer must be non-null. Everything else is checked at the point
    /// where the pointer is read, which is unsafe.
    #[inline]
    pub const fn new<T>(ptr: *const T) -> Self {
        unsafe { Self(NonNull::new_unchecked(ptr as *mut u8), PhantomData) }
    }

    /// Gets the underlying raw pointer as a byte pointer
    #[inline]
    pub const fn as_byte_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Borrows the pointed-to value as a `T`.
    ///
    /// # Safety
    ///
    /// `T` must be the _actual_ underlying type. You're downcasting with no guardrails.
    #[inline]
    pub const unsafe fn get<'borrow: 'mem, T>(self) -> &'borrow T {
        unsafe { &*(self.0.as_ptr() as *const T) }
    }

    /// Returns a pointer with the given offset added
    ///
    /// # Safety
    ///
    /// Offset must be within the bounds of the allocated memory,
    /// and the resulting pointer must be properly aligned.
    #[inline]
    pub const unsafe fn field(self, offset: usize) -> PtrConst<'mem> {
        PtrConst(
            unsafe { NonNull::new_unchecked(self.0.as_ptr().byte_add(offset)) },
            PhantomData,
        )
    }

    /// Exposes [`core::ptr::read`]
    ///
    /// # Safety
    ///
    /// `T` must be the actual underlying type of the pointed-to memory.
    /// The memory must be properly initialized and aligned for type `T`.
    #[inline]
    pub const unsafe fn read<T>(self) -> T {
        unsafe { core::ptr::read(self.0.as_ptr() as *const T) }
    }
}

/// A type-erased pointer to an initialized value
///
/// Typed borrows taken through [`PtrMut::get`] and [`PtrMut::as_mut`] are tied
/// to the borrow of the pointer itself, so they cannot escape the scope that
/// holds the pointer.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct PtrMut<'mem>(NonNull<u8>, PhantomData<&'mem mut ()>);

impl<'mem> PtrMut<'mem> {
    /// Create a new opaque pointer from a raw pointer
    ///
    /// It's encouraged to take the address of something with `&raw mut x`, rather than `&x`
    #[inline]
    pub const fn new<T>(ptr: *mut T) -> Self {
        Self(
            unsafe { NonNull::new_unchecked(ptr as *mut u8) },
            PhantomData,
        )
    }

    /// Gets the underlying raw pointer
    #[inline]
    pub const fn as_byte_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Gets the underlying raw pointer as mutable
    #[inline]
    pub const fn as_mut_byte_ptr(self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Borrows the pointed-to value as a `T`.
    ///
    /// # Safety
    ///
    /// `T` must be the _actual_ underlying type, and no exclusive borrow of the
    /// same memory may be alive.
    #[inline]
    pub unsafe fn get<T>(&self) -> &T {
        unsafe { &*(self.0.as_ptr() as *const T) }
    }

    /// Borrows the pointed-to value mutably as a `T`.
    ///
    /// # Safety
    ///
    /// `T` must be the _actual_ underlying type, the memory must be writable,
    /// and no other borrow of the same memory may be alive.
    #[inline]
    pub unsafe fn as_mut<T>(&mut self) -> &mut T {
        unsafe { &mut *(self.0.as_ptr() as *mut T) }
    }

    /// Make a const ptr out of this mut ptr
    #[inline]
    pub const fn as_const(self) -> PtrConst<'mem> {
        PtrConst(self.0, PhantomData)
    }

    /// Forget that the pointed-to memory is initialized
    #[inline]
    pub const fn as_uninit(self) -> PtrUninit<'mem> {
        PtrUninit(self.0.as_ptr(), PhantomData)
    }

    /// Returns a pointer with the given offset added
    ///
    /// # Safety
    ///
    /// Offset must be within the bounds of the allocated memory,
    /// and the resulting pointer must be properly aligned.
    #[inline]
    pub const unsafe fn field(self, offset: usize) -> PtrMut<'mem> {
        PtrMut(
            unsafe { NonNull::new_unchecked(self.0.as_ptr().byte_add(offset)) },
            PhantomData,
        )
    }

    /// Exposes [`core::ptr::read`]
    ///
    /// # Safety
    ///
    /// `T` must be the actual underlying type of the pointed-to memory.
    /// The memory must be properly initialized and aligned for type `T`.
    #[inline]
    pub const unsafe fn read<T>(self) -> T {
        unsafe { core::ptr::read(self.0.as_ptr() as *const T) }
    }

    /// Exposes [`core::ptr::drop_in_place`]
    ///
    /// # Safety
    ///
    /// `T` must be the actual underlying type of the pointed-to memory.
    /// The memory must be properly initialized and aligned for type `T`.
    /// After calling this function, the memory should not be accessed again
    /// until it is properly reinitialized.
    #[inline]
    pub unsafe fn drop_in_place<T>(self) -> PtrUninit<'mem> {
        unsafe { core::ptr::drop_in_place(self.0.as_ptr() as *mut T) }
        self.as_uninit()
    }
}

/// Reads the arguments of an erased call in declaration order.
///
/// Each argument slot is moved out exactly once; the caller must not drop the
/// argument storage afterwards.
pub struct ArgCursor<'args, 'mem> {
    args: core::slice::Iter<'args, PtrMut<'mem>>,
}

impl<'args, 'mem> ArgCursor<'args, 'mem> {
    /// Start reading at the first argument
    pub fn new(args: &'args [PtrMut<'mem>]) -> Self {
        Self { args: args.iter() }
    }

    /// Moves the next argument out of its slot.
    ///
    /// # Safety
    ///
    /// The next slot must hold an initialized `T`.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer arguments than parameters. Arity is checked
    /// before any erased call is made.
    pub unsafe fn take<T>(&mut self) -> T {
        match self.args.next() {
            Some(arg) => unsafe { arg.read::<T>() },
            None => panic!("erased call received fewer arguments than it declares"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_arguments_in_order() {
        let mut a = 7_u8;
        let mut b = 300_u16;
        let args = [PtrMut::new(&raw mut a), PtrMut::new(&raw mut b)];
        let mut cursor = ArgCursor::new(&args);
        unsafe {
            assert_eq!(cursor.take::<u8>(), 7);
            assert_eq!(cursor.take::<u16>(), 300);
        }
    }

    #[test]
    fn field_offsets_address_into_the_value() {
        let mut pair = (1_u32, 2_u32);
        let ptr = PtrMut::new(&raw mut pair);
        let second = unsafe { ptr.field(core::mem::offset_of!((u32, u32), 1)) };
        assert_eq!(unsafe { second.read::<u32>() }, 2);
    }
}
