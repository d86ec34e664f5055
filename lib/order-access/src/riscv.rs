// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RISC-V ordering operations (RV32 and RV64, RVWMO).
//!
//! The `fence` instruction names its predecessor and successor sets
//! directly, so each pairwise operation gets exactly the ordering it asks for.
//! `fence.i` (Zifencei) only synchronizes the local hart, which is all the
//! cross-modify protocol asks of it: every hart that will run patched code
//! executes its own.

use crate::{MemoryModel, Orders};

sequence! {
    pub FenceRR = "fence r, r" => Orders::LOAD_LOAD,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceWW = "fence w, w" => Orders::STORE_STORE,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceRW = "fence r, w" => Orders::LOAD_STORE,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceWR = "fence w, r" => Orders::STORE_LOAD,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceRRw = "fence r, rw" => Orders::LOAD_LOAD.union(Orders::LOAD_STORE),
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceRwW = "fence rw, w" => Orders::LOAD_STORE.union(Orders::STORE_STORE),
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    pub FenceRwRw = "fence rw, rw" => Orders::DATA,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);

    /// Needs Zifencei.
    pub FenceI = "fence.i" => Orders::INSTRUCTION_STREAM,
        on(any(target_arch = "riscv32", target_arch = "riscv64")),
        options(nostack, preserves_flags);
}

backend! {
    #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
    /// The weakly-ordered RISC-V backend.
    pub enum Riscv {
        name: "riscv",
        arch: &["riscv32", "riscv64"],
        model: MemoryModel::WeaklyOrdered,
        load_load: FenceRR,
        store_store: FenceWW,
        load_store: FenceRW,
        store_load: FenceWR,
        acquire: FenceRRw,
        release: FenceRwW,
        fence: FenceRwRw,
        cross_modify_fence: FenceI,
    }
}
