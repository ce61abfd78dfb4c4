//! Domain layer: chart records, tree assembly and layout
//!
//! Pure and synchronous: no I/O, no CLI, no config loading.

pub mod assembler;
pub mod display;
pub mod entities;
pub mod layout;
pub mod roles;

pub use assembler::{assemble, AssemblyReport, TreeAssembler};
pub use display::TreeDisplay;
pub use entities::{ChartNode, TreeNode};
pub use layout::{annotate, BoxGeometry, RenderNode};
pub use roles::{NodeRole, RoleRules};
