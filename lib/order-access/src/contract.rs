// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Descriptions of the ordering operations and of the backends that implement
//! them.
//!
//! Nothing in here emits an instruction. These types exist so that a backend
//! can state, in a `const`, which instructions it uses for each operation and
//! which orderings those instructions (plus the hardware's own memory model)
//! actually provide. That statement is checked against the contract at build
//! time for every backend, whatever the host architecture is.

use core::fmt;

bitflags::bitflags! {
    /// A set of orderings between a class of memory operations issued before
    /// a barrier and a class issued after it.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Orders: u8 {
        /// Earlier loads complete before later loads.
        const LOAD_LOAD = 1 << 0;
        /// Earlier loads complete before later stores become visible.
        const LOAD_STORE = 1 << 1;
        /// Earlier stores become visible before later stores.
        const STORE_STORE = 1 << 2;
        /// Earlier stores become visible before later loads complete.
        const STORE_LOAD = 1 << 3;
        /// Instructions after the barrier are fetched after it executes, so
        /// they observe code written before it.
        const INSTRUCTION_STREAM = 1 << 4;

        /// All four pairwise data orderings.
        const DATA = Self::LOAD_LOAD.bits()
            | Self::LOAD_STORE.bits()
            | Self::STORE_STORE.bits()
            | Self::STORE_LOAD.bits();
    }
}

/// The eight synchronization operations every backend provides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadLoad,
    StoreStore,
    LoadStore,
    StoreLoad,
    Acquire,
    Release,
    Fence,
    CrossModifyFence,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::LoadLoad,
        Operation::StoreStore,
        Operation::LoadStore,
        Operation::StoreLoad,
        Operation::Acquire,
        Operation::Release,
        Operation::Fence,
        Operation::CrossModifyFence,
    ];

    /// The operations that [`Operation::Fence`] must dominate.
    pub const PAIRWISE: [Operation; 4] = [
        Operation::LoadLoad,
        Operation::StoreStore,
        Operation::LoadStore,
        Operation::StoreLoad,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operation::LoadLoad => "LoadLoad",
            Operation::StoreStore => "StoreStore",
            Operation::LoadStore => "LoadStore",
            Operation::StoreLoad => "StoreLoad",
            Operation::Acquire => "Acquire",
            Operation::Release => "Release",
            Operation::Fence => "Fence",
            Operation::CrossModifyFence => "CrossModifyFence",
        }
    }

    /// Returns the orderings a backend must provide for this operation.
    ///
    /// Acquire keeps every later access behind the earlier loads it follows,
    /// and Release keeps every earlier access ahead of the later stores that
    /// publish it. Neither says anything about the opposite direction.
    pub const fn required(self) -> Orders {
        match self {
            Operation::LoadLoad => Orders::LOAD_LOAD,
            Operation::StoreStore => Orders::STORE_STORE,
            Operation::LoadStore => Orders::LOAD_STORE,
            Operation::StoreLoad => Orders::STORE_LOAD,
            Operation::Acquire => Orders::LOAD_LOAD.union(Orders::LOAD_STORE),
            Operation::Release => Orders::LOAD_STORE.union(Orders::STORE_STORE),
            Operation::Fence => Orders::DATA,
            Operation::CrossModifyFence => Orders::INSTRUCTION_STREAM,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How much ordering the hardware gives for free.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryModel {
    /// Only store-then-load may be reordered (x86 TSO).
    StronglyOrdered,
    /// Independent accesses may be reordered in any direction.
    WeaklyOrdered,
}

impl MemoryModel {
    /// Orderings the hardware maintains with no barrier instruction at all.
    pub const fn implicit(self) -> Orders {
        match self {
            MemoryModel::StronglyOrdered => Orders::LOAD_LOAD
                .union(Orders::LOAD_STORE)
                .union(Orders::STORE_STORE),
            MemoryModel::WeaklyOrdered => Orders::empty(),
        }
    }
}

/// The instructions a backend emits for one operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    /// Assembly text, or empty when only the compiler barrier is emitted.
    pub asm: &'static str,
    /// What the instructions enforce on their own, ignoring the memory model.
    pub enforces: Orders,
}

impl Sequence {
    /// The compiler barrier alone.
    pub const GUARD: Sequence = Sequence {
        asm: "",
        enforces: Orders::empty(),
    };

    pub const fn new(asm: &'static str, enforces: Orders) -> Self {
        Self { asm, enforces }
    }

    pub const fn is_guard_only(&self) -> bool {
        self.asm.is_empty()
    }
}

/// A complete binding of every [`Operation`] to a [`Sequence`].
///
/// There is one field per operation, so a descriptor that forgets one does
/// not compile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    pub name: &'static str,
    /// Values of `target_arch` this backend is compiled for.
    pub arch: &'static [&'static str],
    pub model: MemoryModel,
    pub load_load: Sequence,
    pub store_store: Sequence,
    pub load_store: Sequence,
    pub store_load: Sequence,
    pub acquire: Sequence,
    pub release: Sequence,
    pub fence: Sequence,
    pub cross_modify_fence: Sequence,
}

impl Backend {
    pub const fn sequence(&self, op: Operation) -> Sequence {
        match op {
            Operation::LoadLoad => self.load_load,
            Operation::StoreStore => self.store_store,
            Operation::LoadStore => self.load_store,
            Operation::StoreLoad => self.store_load,
            Operation::Acquire => self.acquire,
            Operation::Release => self.release,
            Operation::Fence => self.fence,
            Operation::CrossModifyFence => self.cross_modify_fence,
        }
    }

    /// The orderings actually observed by other cores after `op`: whatever
    /// the instructions enforce plus whatever the hardware keeps anyway.
    pub const fn guarantee(&self, op: Operation) -> Orders {
        self.model.implicit().union(self.sequence(op).enforces)
    }

    /// Checks that every operation meets its contract and that
    /// [`Operation::Fence`] is at least as strong as each pairwise operation.
    pub const fn validate(&self) -> Result<(), Violation> {
        let mut i = 0;
        while i < Operation::ALL.len() {
            let op = Operation::ALL[i];
            let missing = op.required().difference(self.guarantee(op));
            if !missing.is_empty() {
                return Err(Violation::Unmet { op, missing });
            }
            i += 1;
        }

        let fence = self.guarantee(Operation::Fence);
        let mut i = 0;
        while i < Operation::PAIRWISE.len() {
            let op = Operation::PAIRWISE[i];
            let missing = self.guarantee(op).difference(fence);
            if !missing.is_empty() {
                return Err(Violation::FenceDoesNotDominate { op, missing });
            }
            i += 1;
        }

        Ok(())
    }

    pub const fn is_sound(&self) -> bool {
        self.validate().is_ok()
    }

    /// Does this backend serve the given `target_arch`?
    pub fn serves(&self, arch: &str) -> bool {
        self.arch.iter().any(|a| *a == arch)
    }
}

/// Why a [`Backend`] does not implement the contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// `op` lacks orderings its contract requires.
    Unmet { op: Operation, missing: Orders },
    /// `op` provides orderings that Fence does not.
    FenceDoesNotDominate { op: Operation, missing: Orders },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unmet { op, missing } => {
                write!(f, "{op} is missing required orderings {missing:?}")
            }
            Violation::FenceDoesNotDominate { op, missing } => {
                write!(f, "Fence does not provide {missing:?}, which {op} does")
            }
        }
    }
}
