//! RISC-V trap frame.

/// Per-process data saved by the trampoline on every trap from user space.
///
/// DO NOT REORDER THE FIELDS.
/// The trampoline addresses them by hard-coded offsets.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    /// kernel page table.
    pub kernel_satp: u64,
    /// top of process's kernel stack.
    pub kernel_sp: u64,
    /// usertrap().
    pub kernel_trap: u64,
    /// saved user program counter.
    pub epc: u64,
    /// saved kernel tp.
    pub kernel_hartid: u64,
    pub ra: u64,
    pub sp: u64,
    pub gp: u64,
    pub tp: u64,
    pub t0: u64,
    pub t1: u64,
    pub t2: u64,
    pub s0: u64,
    pub s1: u64,
    pub a0: u64,
    pub a1: u64,
    pub a2: u64,
    pub a3: u64,
    pub a4: u64,
    pub a5: u64,
    pub a6: u64,
    pub a7: u64,
    pub s2: u64,
    pub s3: u64,
    pub s4: u64,
    pub s5: u64,
    pub s6: u64,
    pub s7: u64,
    pub s8: u64,
    pub s9: u64,
    pub s10: u64,
    pub s11: u64,
    pub t3: u64,
    pub t4: u64,
    pub t5: u64,
    pub t6: u64,
}

/// The user-visible part of a [`TrapFrame`].
///
/// This is everything needed to continue a user program exactly where it
/// trapped: the general purpose registers, the stack, return, global and
/// thread pointers, and the program counter.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct UserRegisters {
    /// s0 ~ s11.
    pub s: [u64; 12],
    /// a0 ~ a7.
    pub a: [u64; 8],
    /// t0 ~ t6.
    pub t: [u64; 7],
    pub sp: u64,
    pub ra: u64,
    pub gp: u64,
    pub tp: u64,
    pub epc: u64,
}

impl TrapFrame {
    /// Copy out the user registers.
    pub fn user_registers(&self) -> UserRegisters {
        UserRegisters {
            s: [
                self.s0, self.s1, self.s2, self.s3, self.s4, self.s5, self.s6, self.s7, self.s8,
                self.s9, self.s10, self.s11,
            ],
            a: [
                self.a0, self.a1, self.a2, self.a3, self.a4, self.a5, self.a6, self.a7,
            ],
            t: [
                self.t0, self.t1, self.t2, self.t3, self.t4, self.t5, self.t6,
            ],
            sp: self.sp,
            ra: self.ra,
            gp: self.gp,
            tp: self.tp,
            epc: self.epc,
        }
    }

    /// Overwrite the user registers with `regs`.
    ///
    /// The kernel-only fields are left untouched.
    pub fn set_user_registers(&mut self, regs: &UserRegisters) {
        let UserRegisters {
            s,
            a,
            t,
            sp,
            ra,
            gp,
            tp,
            epc,
        } = *regs;
        [
            self.s0, self.s1, self.s2, self.s3, self.s4, self.s5, self.s6, self.s7, self.s8,
            self.s9, self.s10, self.s11,
        ] = s;
        [
            self.a0, self.a1, self.a2, self.a3, self.a4, self.a5, self.a6, self.a7,
        ] = a;
        [
            self.t0, self.t1, self.t2, self.t3, self.t4, self.t5, self.t6,
        ] = t;
        self.sp = sp;
        self.ra = ra;
        self.gp = gp;
        self.tp = tp;
        self.epc = epc;
    }

    /// Read the `n`-th argument register.
    ///
    /// Returns None if `n` is not in a0 ~ a7.
    pub fn arg(&self, n: usize) -> Option<u64> {
        match n {
            0 => Some(self.a0),
            1 => Some(self.a1),
            2 => Some(self.a2),
            3 => Some(self.a3),
            4 => Some(self.a4),
            5 => Some(self.a5),
            6 => Some(self.a6),
            7 => Some(self.a7),
            _ => None,
        }
    }
}

impl core::fmt::Debug for TrapFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        writeln!(
            f,
            "RA : {:016x} | SP : {:016x} | GP : {:016x} | TP : {:016x}\n\
             T0 : {:016x} | T1 : {:016x} | T2 : {:016x} | T3 : {:016x}\n\
             T4 : {:016x} | T5 : {:016x} | T6 : {:016x}\n\
             S0 : {:016x} | S1 : {:016x} | S2 : {:016x} | S3 : {:016x}\n\
             S4 : {:016x} | S5 : {:016x} | S6 : {:016x} | S7 : {:016x}\n\
             S8 : {:016x} | S9 : {:016x} | S10: {:016x} | S11: {:016x}\n\
             A0 : {:016x} | A1 : {:016x} | A2 : {:016x} | A3 : {:016x}\n\
             A4 : {:016x} | A5 : {:016x} | A6 : {:016x} | A7 : {:016x}\n\
             EPC: {:016x} | HART: {}",
            self.ra,
            self.sp,
            self.gp,
            self.tp,
            self.t0,
            self.t1,
            self.t2,
            self.t3,
            self.t4,
            self.t5,
            self.t6,
            self.s0,
            self.s1,
            self.s2,
            self.s3,
            self.s4,
            self.s5,
            self.s6,
            self.s7,
            self.s8,
            self.s9,
            self.s10,
            self.s11,
            self.a0,
            self.a1,
            self.a2,
            self.a3,
            self.a4,
            self.a5,
            self.a6,
            self.a7,
            self.epc,
            self.kernel_hartid,
        )
    }
}
