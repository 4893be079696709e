//! Error types for graph construction and analysis.
//!
//! Two classes of failure exist:
//!
//! - **Caller input errors** ([`GraphError::InvalidArgument`],
//!   [`GraphError::OutOfRange`]) are detected while a [`crate::Graph`] is
//!   built and surfaced immediately. Nothing is clamped or dropped.
//! - **Invariant violations** ([`GraphError::InternalInvariantViolation`])
//!   mean a component partition or condensation is inconsistent. They are
//!   fatal to the analysis that produced them and must not be retried.

use std::fmt;

use crate::graph::Vertex;

/// Machine-readable error codes for callers that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    OutOfRange,
    InternalInvariantViolation,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "E1001",
            Self::OutOfRange => "E1002",
            Self::InternalInvariantViolation => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid vertex count",
            Self::OutOfRange => "Edge endpoint out of range",
            Self::InternalInvariantViolation => "Internal invariant violation",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument => Some("Pass a vertex count of zero or more."),
            Self::OutOfRange => Some("Every edge endpoint must be in [0, vertex_count)."),
            Self::InternalInvariantViolation => {
                Some("The component partition is inconsistent. Report a bug with the input graph.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The specific invariant that was found broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The condensation graph contains a cycle through this component.
    #[error("condensation graph has a cycle through component {component}")]
    CondensationCycle { component: usize },
    /// A vertex appears in more than one component.
    #[error("vertex {vertex} appears in more than one component")]
    DuplicateMember { vertex: Vertex },
    /// A vertex of the index space is not covered by any component.
    #[error("vertex {vertex} is not covered by any component")]
    MissingMember { vertex: Vertex },
    /// An edge references a vertex outside the component partition.
    #[error("edge endpoint {vertex} is outside the component partition")]
    UnknownVertex { vertex: Vertex },
}

/// Errors from graph construction and analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The requested vertex count is negative or does not fit the index space.
    #[error("invalid vertex count: {vertex_count}")]
    InvalidArgument { vertex_count: i64 },
    /// An edge endpoint lies outside `[0, vertex_count)`.
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    OutOfRange { vertex: i64, vertex_count: usize },
    /// A component partition or condensation graph is inconsistent.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(#[from] InvariantViolation),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::InternalInvariantViolation(_) => ErrorCode::InternalInvariantViolation,
        }
    }

    /// Return `true` for errors caused by caller input rather than a defect.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::InternalInvariantViolation(_))
    }
}
