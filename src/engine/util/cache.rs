use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use super::{CountedRef, RefCountError};

/// Keyed cache of ref-counted instances. The cache never unloads anything
/// itself; `release` hands the instance back once nobody else holds it.
#[derive(Debug)]
pub struct RefCache<K, V> {
    entries: HashMap<K, CountedRef<V>>,
}

impl<K: Eq + Hash + Clone, V> RefCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached instance for `key`, loading it first if needed.
    /// A failed load leaves the cache untouched.
    pub fn acquire<E>(
        &mut self,
        key: &K,
        load: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<Rc<V>, E>
    where
        E: From<RefCountError>,
    {
        if let Some(entry) = self.entries.get_mut(key) {
            return Ok(entry.take_ref()?);
        }
        let mut entry = CountedRef::new(load(key)?);
        let instance = entry.take_ref()?;
        self.entries.insert(key.clone(), entry);
        Ok(instance)
    }

    /// Returns one reference. When it was the last, the entry is removed and
    /// the instance is handed back for unloading.
    pub fn release(&mut self, key: &K, instance: &Rc<V>) -> Result<Option<Rc<V>>, RefCountError> {
        let entry = self.entries.get_mut(key).ok_or(RefCountError::NotCached)?;
        if !entry.return_ref(instance)? {
            return Ok(None);
        }
        self.entries.remove(key);
        Ok(Some(Rc::clone(instance)))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn ref_count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, CountedRef::count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone, V> Default for RefCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
