//! # state2hcl - hcl resource blocks from terraform state
//!
//! ## Introduction for developers
//!
//! Read this to understand how `state2hcl` works internally.
//!
//! ### Flat attributes
//!
//! Legacy state files (version 3 and older) store the attributes of every
//! resource instance as a flat map of strings. Nesting is encoded in the key:
//!
//! ```text
//! ami                           = "ami-123"
//! tags.%                        = "1"            <- size of the map `tags`
//! tags.Name                     = "web1"
//! security_groups.#             = "1"            <- length of the set
//! security_groups.842512562     = "sg-123"       <- key is the hash of the value
//! ingress.#                     = "1"
//! ingress.0.from_port           = "22"           <- key is the list index
//! ```
//!
//! There are no types and no schema. Everything that follows is derived from
//! the shape of the keys alone.
//!
//! ### Loading
//!
//! see [state::State]
//!
//! The state file is decoded into `module -> address -> flat attributes`.
//! Order of the file is preserved so output is reproducible.
//!
//! ### Reconstruction
//!
//! see [reconstruct::reconstruct]
//!
//! Keys are split on `.` and rebuilt into a tree of [node::AttributeNode]s.
//! Count (`#`) and size (`%`) markers are dropped. A key which is used as
//! value and as container at the same time (`foo` and `foo.bar`) is an error
//! for that resource.
//!
//! ### Rendering
//!
//! see [render::render]
//!
//! The tree is written as raw block text. Whether a node with numeric keys is
//! a set, a list or a block is decided here:
//!
//! - `security_groups.842512562 = "sg-123"`: `842512562` is the CRC-32 of
//!   `sg-123`, this is how sets of strings are keyed. Written as
//!   `security_groups = ["sg-123"]`.
//! - `ingress.0.from_port`: keys `0..n` are a list, lists of objects are
//!   written as repeated `ingress { }` blocks.
//! - everything else is a nested block.
//!
//! ### Output
//!
//! see [format::format]
//!
//! Raw text is indented by the [hcl] formatter before it is printed.
//!
pub mod address;
pub mod format;
pub mod generate;
mod keys;
pub mod node;
pub mod reconstruct;
pub mod render;
pub mod state;

pub use generate::{generate, generate_resource, ResourceError};
