//! Runtime catalog of playable boards.
//!
//! Each board module registers itself with [`inventory::submit!`], so any
//! binary that links this crate discovers the full set at startup without
//! a central list. The front-end resolves a CLI name to an entry, loads
//! the ROM set the entry asks for, and has the entry build the machine.

use marquee_core::core::machine::Machine;

use crate::rom_loader::{RomLoadError, RomSet};

type Factory = fn(&RomSet) -> Result<Box<dyn Machine>, RomLoadError>;

/// One playable board: the name it answers to, the ROM set it wants, and
/// the factory that wires CPU, interrupt controller, and board together.
pub struct MachineEntry {
    pub name: &'static str,
    /// ROM set name, used to locate `{rom_name}.zip` and the like.
    pub rom_name: &'static str,
    create: Factory,
}

impl MachineEntry {
    pub const fn new(name: &'static str, rom_name: &'static str, create: Factory) -> Self {
        Self {
            name,
            rom_name,
            create,
        }
    }

    /// Build the machine from a loaded ROM set.
    pub fn build(&self, rom_set: &RomSet) -> Result<Box<dyn Machine>, RomLoadError> {
        (self.create)(rom_set)
    }
}

inventory::collect!(MachineEntry);

/// Every registered board, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// The registered board names, sorted.
pub fn names() -> Vec<&'static str> {
    all().iter().map(|e| e.name).collect()
}

/// Resolve a CLI name to its registry entry.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
