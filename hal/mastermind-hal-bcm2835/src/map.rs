//! GPIO register block mapped from `/dev/mem`
//!
//! The mapping is a process-wide resource: at most one [`GpioMap`] may be
//! live at a time, and dropping it unmaps the block.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::ptr::{self, NonNull};

use log::{debug, info, warn};
use memmap2::{MmapMut, MmapOptions};
use nix::fcntl::OFlag;
use nix::unistd::geteuid;
use portable_atomic::{AtomicBool, Ordering};

use mastermind_hal::{Registers, BLOCK_SIZE};

use crate::error::HalError;

/// Path of the physical memory device
const MEM_DEVICE: &str = "/dev/mem";

/// Words in the mapped block
const BLOCK_WORDS: usize = BLOCK_SIZE / 4;

/// Set while a mapping is live
static MAPPED: AtomicBool = AtomicBool::new(false);

/// Physical address of the GPIO register block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeripheralBase(pub u64);

impl PeripheralBase {
    /// BCM2835 (Pi 1, Zero)
    pub const BCM2835: Self = Self(0x2020_0000);
    /// BCM2836/BCM2837 (Pi 2, Pi 3)
    pub const BCM2837: Self = Self(0x3F20_0000);
    /// BCM2711 (Pi 4)
    pub const BCM2711: Self = Self(0xFE20_0000);

    /// Physical address
    pub fn address(self) -> u64 {
        self.0
    }
}

impl Default for PeripheralBase {
    fn default() -> Self {
        Self::BCM2837
    }
}

/// Memory-mapped GPIO register block
pub struct GpioMap {
    base: NonNull<u32>,
    // Keeps the mapping alive; unmapped on drop
    _mmap: MmapMut,
}

impl GpioMap {
    /// Map the GPIO register block at `base`
    ///
    /// Requires read/write access to `/dev/mem`, normally root. Fails with
    /// [`HalError::AlreadyMapped`] while another mapping is live.
    pub fn acquire(base: PeripheralBase) -> Result<Self, HalError> {
        if MAPPED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(HalError::AlreadyMapped);
        }

        match Self::map(base) {
            Ok(map) => Ok(map),
            Err(e) => {
                MAPPED.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn map(base: PeripheralBase) -> Result<Self, HalError> {
        if !geteuid().is_root() {
            warn!("not running as root, mapping {} will likely fail", MEM_DEVICE);
        }

        let file: File = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(OFlag::O_SYNC.bits())
            .open(MEM_DEVICE)
            .map_err(|source| HalError::Open {
                path: MEM_DEVICE,
                source,
            })?;

        // SAFETY: the mapping covers device memory that no other part of
        // this process aliases; the MAPPED guard ensures a single mapping.
        let mut mmap = unsafe {
            MmapOptions::new()
                .offset(base.address())
                .len(BLOCK_SIZE)
                .map_mut(&file)
        }
        .map_err(|source| HalError::Map {
            base: base.address(),
            source,
        })?;

        let base_ptr = NonNull::new(mmap.as_mut_ptr().cast::<u32>()).ok_or(HalError::Map {
            base: base.address(),
            source: std::io::Error::other("null mapping"),
        })?;

        info!(
            "GPIO block at {:#010x} mapped ({} bytes)",
            base.address(),
            BLOCK_SIZE
        );

        Ok(Self {
            base: base_ptr,
            _mmap: mmap,
        })
    }
}

impl Registers for GpioMap {
    fn read_word(&self, index: usize) -> u32 {
        assert!(index < BLOCK_WORDS);
        // SAFETY: index is inside the mapped block, which lives as long
        // as self; device registers need volatile access.
        unsafe { ptr::read_volatile(self.base.as_ptr().add(index)) }
    }

    fn write_word(&self, index: usize, value: u32) {
        assert!(index < BLOCK_WORDS);
        // SAFETY: as above
        unsafe { ptr::write_volatile(self.base.as_ptr().add(index), value) }
    }
}

impl Drop for GpioMap {
    fn drop(&mut self) {
        debug!("unmapping GPIO block");
        MAPPED.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_bases() {
        assert_eq!(PeripheralBase::default(), PeripheralBase::BCM2837);
        assert_eq!(PeripheralBase::BCM2837.address(), 0x3F20_0000);
        assert_eq!(PeripheralBase::BCM2711.address(), 0xFE20_0000);
    }

    #[test]
    fn test_block_is_page_sized() {
        assert_eq!(BLOCK_WORDS, 1024);
    }

    // Runs with or without access to /dev/mem; the only test that maps
    #[test]
    fn test_single_live_mapping() {
        match GpioMap::acquire(PeripheralBase::default()) {
            Ok(first) => {
                assert!(matches!(
                    GpioMap::acquire(PeripheralBase::default()),
                    Err(HalError::AlreadyMapped)
                ));
                drop(first);
                assert!(GpioMap::acquire(PeripheralBase::default()).is_ok());
            }
            Err(e) => {
                assert!(!matches!(e, HalError::AlreadyMapped));
                // A failed mapping releases the guard
                assert!(!MAPPED.load(Ordering::Acquire));
                let second = GpioMap::acquire(PeripheralBase::default());
                assert!(!matches!(second, Err(HalError::AlreadyMapped)));
            }
        }
    }
}
