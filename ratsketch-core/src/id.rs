//! # IDs
//! Process-unique identifiers, namespaced by a marker type. `SketchID<A>` and
//! `SketchID<B>` are drawn from separate counters, so they can never be mixed up.
//!
//! IDs are only meaningful within one run of the program. Don't persist them.

static COUNTERS: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

pub struct SketchID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> Clone for SketchID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SketchID<T> {}
impl<T: std::any::Any> PartialEq for SketchID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SketchID<T> {}
impl<T: std::any::Any> PartialOrd for SketchID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for SketchID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: std::any::Any> std::hash::Hash for SketchID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: std::any::Any> SketchID<T> {
    /// Allocate the next ID in `T`'s namespace. IDs within a namespace increase monotonically.
    #[must_use]
    pub fn next() -> Self {
        use std::sync::atomic::Ordering;
        let ty = std::any::TypeId::of::<T>();
        let raw = {
            let read = COUNTERS.upgradable_read();
            if let Some(counter) = read.get(&ty) {
                counter.fetch_add(1, Ordering::Relaxed)
            } else {
                // First ID of this namespace. Rare, so the upgrade cost doesn't matter.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                write
                    .entry(ty)
                    .or_insert_with(|| 1.into())
                    .fetch_add(1, Ordering::Relaxed)
            }
        };
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // Wrapped all the way around. Uniqueness is gone, nothing sane to hand out.
            log::error!("{} ID space exhausted", std::any::type_name::<T>());
            panic!("{} ID space exhausted", std::any::type_name::<T>());
        };
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
    /// Raw numeric value. Values from different namespaces may collide.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for SketchID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> std::fmt::Display for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
