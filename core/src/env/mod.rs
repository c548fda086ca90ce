//! Firmware environment access
//!
//! The environment is an external key-value store. This module only needs
//! read access to a single key per lookup.

pub mod key;
pub mod locator;

pub use key::EnvKey;
pub use locator::locate;

/// Read-only view of a key-value environment
pub trait EnvStore {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Option<&str>;
}

impl<'a> EnvStore for [(&'a str, &'a str)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl<'a, const N: usize> EnvStore for [(&'a str, &'a str); N] {
    fn get(&self, key: &str) -> Option<&str> {
        EnvStore::get(self.as_slice(), key)
    }
}

impl<T: EnvStore + ?Sized> EnvStore for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}
