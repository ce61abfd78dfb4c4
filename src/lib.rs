//! Organization chart engine.
//!
//! Rebuilds a chart hierarchy from flat parent-linked records, applies the
//! single-root and terminal-node rules, and annotates every node with the box
//! and connector geometry a rendering surface needs.
//!
//! ```
//! use orgchart::domain::{annotate, assemble, ChartNode};
//!
//! let forest = assemble(vec![
//!     ChartNode::new(1, "GENEL KURUL", None, 0),
//!     ChartNode::new(2, "YÖNETİM KURULU", Some(1), 0),
//! ]);
//! let chart = annotate(forest);
//! assert_eq!(chart[0].box_width, 200);
//! assert_eq!(chart[0].children[0].connector_height, Some(50));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
