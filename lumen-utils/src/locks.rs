//! Thin wrappers around `parking_lot` locks.

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A synchronous reader-writer lock.
#[derive(Debug, Default)]
pub struct SyncRwLock<T>(RwLock<T>);

impl<T> SyncRwLock<T> {
    /// Creates a new lock holding `value`.
    pub const fn new(value: T) -> Self {
        Self(RwLock::new(value))
    }

    /// Acquires a shared read guard.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Acquires an exclusive write guard.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }
}

/// A synchronous mutex.
#[derive(Debug, Default)]
pub struct SyncMutex<T>(Mutex<T>);

impl<T> SyncMutex<T> {
    /// Creates a new mutex holding `value`.
    pub const fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    /// Acquires the mutex.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock()
    }
}
