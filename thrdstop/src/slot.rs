//! Context slots.
//!
//! Each process owns [`MAX_SLOTS`] slots. A slot holds one saved
//! [`UserRegisters`] record and a `used` flag. Slots are filled when a
//! deadline fires or when `cancelthrdstop` asks for a snapshot, and they are
//! read back by `thrdresume`.
//!
//! Slot indices come from user space as signed integers. A negative index
//! asks the kernel to pick a free slot; any other index must be in
//! `0..MAX_SLOTS`.
use crate::{Error, MAX_SLOTS};
use hart::UserRegisters;

/// A saved user register record.
#[derive(Clone, Copy, Default, Debug)]
pub struct ContextSlot {
    regs: UserRegisters,
    used: bool,
}

/// The fixed-size slot table of a process.
pub struct ContextSlotManager {
    slots: [ContextSlot; MAX_SLOTS],
}

impl ContextSlotManager {
    /// Create a table with every slot free.
    pub fn new() -> Self {
        Self {
            slots: [ContextSlot::default(); MAX_SLOTS],
        }
    }

    /// Validate a slot index received from user space.
    pub fn check(slot_id: i32) -> Result<usize, Error> {
        usize::try_from(slot_id)
            .ok()
            .filter(|id| *id < MAX_SLOTS)
            .ok_or(Error::InvalidArgument)
    }

    fn get_mut(&mut self, slot_id: usize) -> Result<&mut ContextSlot, Error> {
        self.slots.get_mut(slot_id).ok_or(Error::InvalidArgument)
    }

    /// Resolve `slot_id` into a slot that is marked used.
    ///
    /// A negative `slot_id` takes the first free slot, or fails with
    /// [`Error::ResourceExhausted`] without touching the table. Otherwise the
    /// given slot is marked used whatever it held before.
    pub fn allocate_or_use(&mut self, slot_id: i32) -> Result<usize, Error> {
        if slot_id < 0 {
            let (id, slot) = self
                .slots
                .iter_mut()
                .enumerate()
                .find(|(_, slot)| !slot.used)
                .ok_or(Error::ResourceExhausted)?;
            slot.used = true;
            Ok(id)
        } else {
            let id = Self::check(slot_id)?;
            self.slots[id].used = true;
            Ok(id)
        }
    }

    /// Mark the slot free.
    pub fn release(&mut self, slot_id: usize) -> Result<(), Error> {
        self.get_mut(slot_id)?.used = false;
        Ok(())
    }

    /// Store `regs` into the slot and mark it used.
    pub fn write(&mut self, slot_id: usize, regs: &UserRegisters) -> Result<(), Error> {
        let slot = self.get_mut(slot_id)?;
        slot.regs = *regs;
        slot.used = true;
        Ok(())
    }

    /// Load the record stored in the slot.
    ///
    /// A free slot has nothing to resume and reads as
    /// [`Error::InvalidArgument`].
    pub fn read(&self, slot_id: usize) -> Result<UserRegisters, Error> {
        match self.slots.get(slot_id) {
            Some(slot) if slot.used => Ok(slot.regs),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Whether the slot is in use.
    pub fn is_used(&self, slot_id: usize) -> bool {
        self.slots.get(slot_id).map(|slot| slot.used).unwrap_or(false)
    }

    /// Number of slots in use.
    pub fn used(&self) -> usize {
        self.slots.iter().filter(|slot| slot.used).count()
    }
}

impl Default for ContextSlotManager {
    fn default() -> Self {
        Self::new()
    }
}
