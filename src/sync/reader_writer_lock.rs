use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A lock allowing many concurrent readers or a single writer.
///
/// The first reader of a "read wave" takes the exclusive lock on behalf of all readers
/// that join while the wave lasts, and the last reader to leave gives it back. Writers
/// take the exclusive lock directly.
///
/// Properties callers have to live with:
/// - There is no fairness. A steady stream of overlapping readers keeps the exclusive
///   lock held and can starve a waiting writer indefinitely.
/// - There is no upgrade path, no timeout and no cancellation.
/// - Taking a read lock twice on one thread is fine, but taking the write lock while
///   holding a read lock on the same thread deadlocks.
pub struct ReaderWriterLock<T: ?Sized> {
    raw: RawReaderWriterLock,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is mediated by `raw`, which hands out either shared access to
// any number of readers or unique access to one writer.
unsafe impl<T: ?Sized + Send> Send for ReaderWriterLock<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for ReaderWriterLock<T> {}

impl<T> ReaderWriterLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            raw: RawReaderWriterLock::new(),
            data: UnsafeCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> ReaderWriterLock<T> {
    /// Blocks until shared access is granted.
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.raw.acquire_read();
        ReadGuard { lock: self }
    }

    /// Blocks until exclusive access is granted.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.raw.acquire_write();
        WriteGuard { lock: self }
    }

    /// Exclusive borrow of the value, no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

impl<T: Default> Default for ReaderWriterLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for ReaderWriterLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderWriterLock")
            .field("readers", &self.raw.reader_count())
            .finish_non_exhaustive()
    }
}

/// Shared access to the value guarded by a [`ReaderWriterLock`].
pub struct ReadGuard<'a, T: ?Sized> {
    lock: &'a ReaderWriterLock<T>,
}

impl<T: ?Sized> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the read lock is held for the guard's lifetime, so no writer exists.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.raw.release_read();
    }
}

/// Exclusive access to the value guarded by a [`ReaderWriterLock`].
pub struct WriteGuard<'a, T: ?Sized> {
    lock: &'a ReaderWriterLock<T>,
}

impl<T: ?Sized> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the write lock is held for the guard's lifetime.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the write lock is held for the guard's lifetime and the guard is the
        // only path to the value.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.raw.release_write();
    }
}

/// The lock state without any guarded value.
struct RawReaderWriterLock {
    exclusive: Semaphore,
    count_guard: Mutex<usize>,
}

impl RawReaderWriterLock {
    fn new() -> Self {
        Self {
            exclusive: Semaphore::new(),
            count_guard: Mutex::new(0),
        }
    }

    fn acquire_read(&self) {
        let mut readers = lock_ignoring_poison(&self.count_guard);
        *readers += 1;
        if *readers == 1 {
            // Still holding `count_guard`: readers arriving behind us queue up here
            // until a pending writer lets go.
            self.exclusive.acquire();
        }
    }

    fn release_read(&self) {
        let mut readers = lock_ignoring_poison(&self.count_guard);
        *readers -= 1;
        if *readers == 0 {
            self.exclusive.release();
        }
    }

    fn acquire_write(&self) {
        self.exclusive.acquire();
    }

    fn release_write(&self) {
        self.exclusive.release();
    }

    fn reader_count(&self) -> usize {
        *lock_ignoring_poison(&self.count_guard)
    }
}

/// Binary semaphore. Unlike a `MutexGuard` it may be released by a thread other than
/// the one that acquired it, which happens whenever the last reader of a wave is not
/// the first one.
struct Semaphore {
    held: Mutex<bool>,
    released: Condvar,
}

impl Semaphore {
    fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    fn acquire(&self) {
        let mut held = lock_ignoring_poison(&self.held);
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    fn release(&self) {
        let mut held = lock_ignoring_poison(&self.held);
        *held = false;
        drop(held);
        self.released.notify_one();
    }
}

// The internal mutexes only protect a counter and a flag, both of which are updated in a
// single step, so a panic elsewhere can never leave them half-written.
fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
