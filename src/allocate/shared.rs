//! Thread safe handle over one [`AddressSpace`].

use super::AddressSpace;
use crate::error::{AllocateError, Result};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle funnelling every caller through one lock.
///
/// Each operation holds the lock for its whole duration, so a reserve
/// followed by an allocate from another thread never interleaves.
#[derive(Debug, Clone, Default)]
pub struct SharedAddressSpace {
    inner: Arc<Mutex<AddressSpace>>,
}

impl SharedAddressSpace {
    pub fn new(space: AddressSpace) -> SharedAddressSpace {
        SharedAddressSpace {
            inner: Arc::new(Mutex::new(space)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AddressSpace>> {
        self.inner
            .lock()
            .map_err(|e| AllocateError::LockPoisoned(e.to_string()))
    }

    /// Run `f` with exclusive access, for multi step updates.
    pub fn with<T>(&self, f: impl FnOnce(&mut AddressSpace) -> Result<T>) -> Result<T> {
        let mut space = self.lock()?;
        f(&mut space)
    }

    pub fn reserve<I, S>(&self, cidrs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lock()?.reserve(cidrs)
    }

    pub fn release(&self, cidr: &str) -> Result<()> {
        self.lock()?.release(cidr);
        Ok(())
    }

    pub fn allocate(&self, mask_ones: u8) -> Result<String> {
        self.lock()?.allocate(mask_ones)
    }

    pub fn allocate_with_preference(&self, mask_ones: u8, start_at_range: &str) -> Result<String> {
        self.lock()?.allocate_with_preference(mask_ones, start_at_range)
    }

    pub fn allocate_one_ip_address(&self) -> Result<String> {
        self.lock()?.allocate_one_ip_address()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<AddressSpace> {
        Ok(self.lock()?.clone())
    }
}

impl fmt::Display for SharedAddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.lock() {
            Ok(space) => write!(f, "{space}"),
            Err(_) => f.write_str("<poisoned>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Range;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_concurrent_allocations_are_disjoint() {
        let shared = SharedAddressSpace::new(AddressSpace::with_parent("10.250.0.0/16").unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..16)
                        .map(|_| shared.allocate(24).unwrap())
                        .collect::<Vec<String>>()
                })
            })
            .collect();

        let all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(all.len(), 128);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), 128);

        let ranges: Vec<Range> = all.iter().map(|c| Range::parse(c).unwrap()).collect();
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
        assert_eq!(shared.snapshot().unwrap().occupied().len(), 128);
    }

    #[test]
    fn test_with_is_atomic() {
        let shared = SharedAddressSpace::new(AddressSpace::with_parent("10.250.0.0/24").unwrap());
        let cidr = shared
            .with(|space| {
                space.reserve(["10.250.0.0/25"])?;
                space.allocate(25)
            })
            .unwrap();
        assert_eq!(cidr, "10.250.0.128/25");
        assert_eq!(
            shared.to_string(),
            "10.250.0.0/24(10.250.0.0/25 10.250.0.128/25)"
        );
        shared.release("10.250.0.0/25").unwrap();
        assert_eq!(shared.allocate_one_ip_address().unwrap(), "10.250.0.0");
    }

    #[test]
    fn test_poisoned_lock() {
        let shared = SharedAddressSpace::default();
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert!(matches!(
            shared.allocate(24).unwrap_err(),
            AllocateError::LockPoisoned(_)
        ));
        assert_eq!(shared.to_string(), "<poisoned>");
    }
}
