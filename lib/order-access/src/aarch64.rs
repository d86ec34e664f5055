// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! AArch64 ordering operations, shared by Linux, Windows and macOS.
//!
//! Nothing is ordered for free on this architecture. We use two strengths of
//! Data Memory Barrier over the inner-shareable domain: `dmb ishld` orders
//! earlier loads against everything after it, which covers Acquire, LoadLoad
//! and LoadStore; `dmb ish` orders everything against everything and covers
//! the rest. These are the same instructions the compiler emits for acquire
//! and release/seq-cst fences.

use crate::{MemoryModel, Orders};

sequence! {
    pub DmbIshld = "dmb ishld" => Orders::LOAD_LOAD.union(Orders::LOAD_STORE),
        on(target_arch = "aarch64"), options(nostack, preserves_flags);

    pub DmbIsh = "dmb ish" => Orders::DATA,
        on(target_arch = "aarch64"), options(nostack, preserves_flags);

    /// Only flushes this core's pipeline.
    pub Isb = "isb" => Orders::INSTRUCTION_STREAM,
        on(target_arch = "aarch64"), options(nostack, preserves_flags);
}

backend! {
    #[cfg(target_arch = "aarch64")]
    /// The weakly-ordered AArch64 backend.
    pub enum Aarch64 {
        name: "aarch64",
        arch: &["aarch64"],
        model: MemoryModel::WeaklyOrdered,
        load_load: DmbIshld,
        store_store: DmbIsh,
        load_store: DmbIshld,
        store_load: DmbIsh,
        acquire: DmbIshld,
        release: DmbIsh,
        fence: DmbIsh,
        cross_modify_fence: Isb,
    }
}
