//! Conformance fixture for [`keymap::Map`] implementations.
//!
//! Every check runs the implementation under test next to [`Reference`], a
//! trusted map over the standard library's `BTreeMap`, and compares the two
//! by structural equality after each operation. [`kernel_suite!`] covers
//! each kernel method with fixed cases; [`Session`] replays arbitrary op
//! sequences for the randomized [`runner`] and the fuzz target.

pub mod config;
pub mod op;
pub mod reference;
pub mod runner;
pub mod session;
pub mod strategy;
pub mod suite;

#[doc(hidden)]
pub use keymap;

pub use config::{load_config, Backing, Config};
pub use op::{Op, Outcome};
pub use reference::Reference;
pub use session::{Divergence, DivergenceKind, Session};
