//! Interrupt
//!
//! Decoding of the supervisor trap registers and the classification code
//! handed to the trap dispatcher.
use num_enum::{IntoPrimitive, TryFromPrimitive};

mod frame;

pub use frame::{TrapFrame, UserRegisters};

bitflags::bitflags! {
    /// Supervisor status register.
    pub struct SStatus: u64 {
        /// Supervisor interrupt enable.
        const SIE = 1 << 1;
        /// Previous supervisor interrupt enable.
        const SPIE = 1 << 5;
        /// Previous privilege mode. Set when the trap came from supervisor mode.
        const SPP = 1 << 8;
    }
}

impl SStatus {
    /// Status of a trap taken from user mode with interrupts enabled.
    #[inline]
    pub fn from_user() -> Self {
        Self::SPIE
    }

    /// Status of a trap taken from supervisor mode.
    #[inline]
    pub fn from_supervisor() -> Self {
        Self::SPP | Self::SPIE
    }
}

/// Supervisor trap cause register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scause(pub u64);

impl Scause {
    /// The interrupt bit.
    pub const INTERRUPT: u64 = 0x8000_0000_0000_0000;
    /// Environment call from user mode.
    pub const USER_ECALL: Scause = Scause(8);
    /// Supervisor software interrupt, forwarded from the machine-mode timer.
    pub const SUPERVISOR_SOFTWARE: Scause = Scause(Self::INTERRUPT | 1);
    /// Supervisor external interrupt, delivered through the PLIC.
    pub const SUPERVISOR_EXTERNAL: Scause = Scause(Self::INTERRUPT | 9);

    /// Whether this cause is an interrupt rather than an exception.
    #[inline]
    pub fn is_interrupt(&self) -> bool {
        self.0 & Self::INTERRUPT != 0
    }

    /// Exception or interrupt code.
    #[inline]
    pub fn code(&self) -> u64 {
        self.0 & !Self::INTERRUPT
    }
}

/// Classification of a trap, as produced by the interrupt dispatcher.
///
/// The discriminants are the wire values: `0` for an unrecognized cause,
/// `1` for an ordinary device interrupt and `2` for a timer interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum InterruptKind {
    /// Not an interrupt this kernel knows about.
    Unrecognized = 0,
    /// An external device interrupt.
    Device = 1,
    /// A timer interrupt.
    Timer = 2,
}

impl InterruptKind {
    /// Classify `scause`.
    pub fn classify(scause: Scause) -> Self {
        if scause.is_interrupt() && (scause.code() & 0xff) == 9 {
            Self::Device
        } else if scause == Scause::SUPERVISOR_SOFTWARE {
            Self::Timer
        } else {
            Self::Unrecognized
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(
            InterruptKind::classify(Scause::SUPERVISOR_SOFTWARE),
            InterruptKind::Timer
        );
        assert_eq!(
            InterruptKind::classify(Scause::SUPERVISOR_EXTERNAL),
            InterruptKind::Device
        );
        assert_eq!(
            InterruptKind::classify(Scause::USER_ECALL),
            InterruptKind::Unrecognized
        );
        // A page fault is an exception, not an interrupt.
        assert_eq!(
            InterruptKind::classify(Scause(13)),
            InterruptKind::Unrecognized
        );
    }

    #[test]
    fn wire_values() {
        assert_eq!(u8::from(InterruptKind::Timer), 2);
        assert_eq!(
            InterruptKind::try_from_primitive(1).ok(),
            Some(InterruptKind::Device)
        );
        assert!(InterruptKind::try_from_primitive(3).is_err());
    }

    #[test]
    fn sstatus() {
        assert!(!SStatus::from_user().contains(SStatus::SPP));
        assert!(SStatus::from_supervisor().contains(SStatus::SPP));
        assert_eq!(SStatus::from_bits_truncate(0x100), SStatus::SPP);
    }
}
