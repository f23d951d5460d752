//! Object registry
//!
//! Name table for kernel objects. This is what an external inspector reads
//! to find queues, semaphores and timers by name.

use heapless::Vec;

use crate::config::CFG_QUEUE_REGISTRY_SIZE;
use crate::error::{OsError, OsResult};
use crate::kernel::Kernel;
use crate::task::TaskEntry;
use crate::types::{OsObjType, QueueId, SemId, TimerId};

/// A registrable kernel object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KernelObject {
    Queue(QueueId),
    Semaphore(SemId),
    Timer(TimerId),
}

impl From<QueueId> for KernelObject {
    fn from(id: QueueId) -> Self {
        KernelObject::Queue(id)
    }
}

impl From<SemId> for KernelObject {
    fn from(id: SemId) -> Self {
        KernelObject::Semaphore(id)
    }
}

impl From<TimerId> for KernelObject {
    fn from(id: TimerId) -> Self {
        KernelObject::Timer(id)
    }
}

/// Registry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryEntry {
    pub name: &'static str,
    pub object: KernelObject,
}

/// Name table, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry, CFG_QUEUE_REGISTRY_SIZE>,
}

impl Registry {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register `object` under `name`
    ///
    /// Registering an object again replaces its name.
    pub fn add(&mut self, object: KernelObject, name: &'static str) -> OsResult<()> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.object == object) {
            entry.name = name;
            return Ok(());
        }
        self.entries
            .push(RegistryEntry { name, object })
            .map_err(|_| OsError::RegistryFull)
    }

    /// Drop the entry for `object`; later entries keep their order
    pub fn remove(&mut self, object: KernelObject) -> bool {
        match self.entries.iter().position(|e| e.object == object) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn name_of(&self, object: KernelObject) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.object == object)
            .map(|e| e.name)
    }

    /// First object registered under `name`
    pub fn lookup(&self, name: &str) -> Option<KernelObject> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.object)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn has_room(&self) -> bool {
        !self.entries.is_full()
    }
}

impl<T: TaskEntry> Kernel<T> {
    /// Register a queue, semaphore or timer under `name`
    pub fn registry_add(&mut self, object: impl Into<KernelObject>, name: &'static str) -> OsResult<()> {
        let object = object.into();
        self.obj_type(object)?;
        self.registry.add(object, name)
    }

    /// Drop an object's registry entry
    pub fn registry_remove(&mut self, object: impl Into<KernelObject>) -> bool {
        self.registry.remove(object.into())
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registered objects, in registration order
    pub fn objects(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.registry.iter()
    }

    /// Type marker of a live object
    pub fn obj_type(&self, object: KernelObject) -> OsResult<OsObjType> {
        match object {
            KernelObject::Queue(q) => self.queue_ref(q).map(|_| OsObjType::Queue),
            KernelObject::Semaphore(s) => self.sem_ref(s).map(|sem| {
                if sem.kind().is_mutex() {
                    OsObjType::Mutex
                } else {
                    OsObjType::Sem
                }
            }),
            KernelObject::Timer(t) => self.timer_ref(t).map(|_| OsObjType::Timer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_lookup() {
        let mut reg = Registry::new();
        reg.add(KernelObject::Queue(QueueId(0)), "queue1").unwrap();
        reg.add(KernelObject::Semaphore(SemId(0)), "BINARY").unwrap();

        assert_eq!(reg.lookup("queue1"), Some(KernelObject::Queue(QueueId(0))));
        assert_eq!(reg.name_of(KernelObject::Semaphore(SemId(0))), Some("BINARY"));
        assert_eq!(reg.lookup("missing"), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_readd_replaces_name() {
        let mut reg = Registry::new();
        reg.add(KernelObject::Timer(TimerId(1)), "old").unwrap();
        reg.add(KernelObject::Timer(TimerId(1)), "new").unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup("old"), None);
        assert_eq!(reg.name_of(KernelObject::Timer(TimerId(1))), Some("new"));
    }

    #[test]
    fn test_full_and_remove() {
        let mut reg = Registry::new();
        for i in 0..CFG_QUEUE_REGISTRY_SIZE {
            reg.add(KernelObject::Queue(QueueId(i as u8)), "q").unwrap();
        }
        assert!(!reg.has_room());
        assert_eq!(
            reg.add(KernelObject::Semaphore(SemId(0)), "late"),
            Err(OsError::RegistryFull)
        );

        assert!(reg.remove(KernelObject::Queue(QueueId(0))));
        assert!(!reg.remove(KernelObject::Queue(QueueId(0))));
        assert!(reg.has_room());
    }
}
