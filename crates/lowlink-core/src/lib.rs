#![forbid(unsafe_code)]
//! lowlink-core library.
//!
//! Structural analysis of directed graphs given as edge lists:
//!
//! - [`scc`]: strongly connected components (Tarjan).
//! - [`bridge`]: cut-edges via DFS low-links.
//! - [`condense`]: the SCC condensation and its topological order.
//! - [`analysis`]: all three in one pass with summary stats.
//!
//! Vertices are dense indices `0..N`. Use [`labels::LabelMap`] to translate
//! external names into that space and back.
//!
//! ```
//! use lowlink_core::{Graph, bridge, scc};
//!
//! let g = Graph::from_edges(3, &[(0, 1), (1, 0), (1, 2)])?;
//! assert_eq!(scc::find_strongly_connected_components(&g).len(), 2);
//! assert_eq!(bridge::find_bridges(&g).len(), 1);
//! # Ok::<(), lowlink_core::GraphError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Every fallible operation returns [`GraphError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Threads**: Engines take `&Graph` and own their traversal state, so
//!   one graph may be analysed concurrently without locking.

pub mod analysis;
pub mod bridge;
pub mod condense;
pub mod error;
pub mod graph;
pub mod labels;
pub mod scc;

pub use analysis::{Analysis, AnalysisOptions, AnalysisStats};
pub use bridge::{BridgeView, find_bridges, find_bridges_with};
pub use condense::{Condensation, topologically_sort_components};
pub use error::{ErrorCode, GraphError, InvariantViolation};
pub use graph::{Edge, EdgeId, Graph, Vertex, build_graph};
pub use labels::LabelMap;
pub use scc::{Components, find_strongly_connected_components, tarjan};
