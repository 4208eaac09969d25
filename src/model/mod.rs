mod process;
mod work_item;

pub use process::*;
pub use work_item::*;

pub type DefinitionId = u64;
pub type ProcessId = u64;
pub type WorkItemId = u64;
