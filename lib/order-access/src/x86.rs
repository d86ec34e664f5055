// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! x86 and x86-64 ordering operations.
//!
//! These follow Doug Lea's cookbook for Java implementations:
//! http://gee.cs.oswego.edu/dl/jmm/cookbook.html
//!
//! The hardware only lets a store be passed by a later load (to a different
//! location) out of its store buffer. Everything else is already ordered, so
//! all that is left for most operations is keeping the compiler in line.
//!
//! For StoreLoad and Fence we use a locked no-op add on the top of the stack.
//! Both it and `mfence` are full fences here; the `mfence` feature switches to
//! the dedicated instruction.

use crate::{Guard, MemoryModel, Orders, Sequence};

sequence! {
    pub Mfence = "mfence" => Orders::DATA,
        on(any(target_arch = "x86", target_arch = "x86_64")),
        options(nostack, preserves_flags);

    /// The add touches the word at the stack pointer, which belongs to us,
    /// and leaves it unchanged. It does clobber the flags.
    pub LockAddRsp = "lock add dword ptr [rsp], 0" => Orders::DATA,
        on(target_arch = "x86_64"), options(nostack);

    pub LockAddEsp = "lock add dword ptr [esp], 0" => Orders::DATA,
        on(target_arch = "x86"), options(nostack);
}

#[cfg(feature = "mfence")]
type Full = Mfence;
#[cfg(all(not(feature = "mfence"), target_arch = "x86"))]
type Full = LockAddEsp;
#[cfg(all(not(feature = "mfence"), not(target_arch = "x86")))]
type Full = LockAddRsp;

/// CPUID is architecturally serializing: it drains the store buffer and
/// discards anything already fetched.
pub enum Cpuid {}

impl Cpuid {
    pub const SEQUENCE: Sequence = Sequence::new("cpuid", Orders::all());

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[inline(always)]
    pub fn emit() {
        #[cfg(target_arch = "x86")]
        use core::arch::x86 as arch;
        #[cfg(target_arch = "x86_64")]
        use core::arch::x86_64 as arch;

        // Safety: leaf 0 exists on every processor that implements CPUID,
        // which is everything we can be compiled for. The intrinsic takes
        // care of the register LLVM reserves (rbx/ebx) around the
        // instruction.
        #[allow(unused_unsafe)]
        let _ = unsafe { arch::__cpuid(0) };
        crate::compiler_barrier();
    }
}

backend! {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    /// The strongly-ordered backend.
    pub enum X86 {
        name: "x86",
        arch: &["x86", "x86_64"],
        model: MemoryModel::StronglyOrdered,
        load_load: Guard,
        store_store: Guard,
        load_store: Guard,
        store_load: Full,
        acquire: Guard,
        release: Guard,
        fence: Full,
        cross_modify_fence: Cpuid,
    }
}
