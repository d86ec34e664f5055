// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ARM (i.e. the old 32-bit architecture) ordering operations.
//!
//! Memory accesses that don't impact the pipeline can be entirely handled
//! with the Data Memory Barrier instruction, or DMB. One can technically
//! express finer-grained barriers than we do here (we use `dmb sy` meaning
//! "all memory operations, full system"), but the little M-profile ARMs we
//! target only support the coarse grained version. And so, we hit all our
//! problems with the same hammer.
//!
//! The exception is the instruction stream, which needs an Instruction
//! Synchronization Barrier.

use crate::{MemoryModel, Orders};

sequence! {
    pub DmbSy = "dmb sy" => Orders::DATA,
        on(target_arch = "arm"), options(nostack, preserves_flags);

    pub IsbSy = "isb sy" => Orders::INSTRUCTION_STREAM,
        on(target_arch = "arm"), options(nostack, preserves_flags);
}

backend! {
    #[cfg(target_arch = "arm")]
    /// The weakly-ordered 32-bit ARM backend.
    pub enum Arm {
        name: "arm",
        arch: &["arm"],
        model: MemoryModel::WeaklyOrdered,
        load_load: DmbSy,
        store_store: DmbSy,
        load_store: DmbSy,
        store_load: DmbSy,
        acquire: DmbSy,
        release: DmbSy,
        fence: DmbSy,
        cross_modify_fence: IsbSy,
    }
}
