use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    InputMalformed,
    ConfigParseError,
    InputTooLarge,
    InvalidVertexReference,
    CycleDetected,
    DistanceOverflow,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::InputMalformed => "E1002",
            Self::ConfigParseError => "E1003",
            Self::InputTooLarge => "E1004",
            Self::InvalidVertexReference => "E2001",
            Self::CycleDetected => "E2002",
            Self::DistanceOverflow => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Input file could not be read",
            Self::InputMalformed => "Input file is not a valid graph document",
            Self::ConfigParseError => "Config file parse error",
            Self::InputTooLarge => "Graph has too many vertices",
            Self::InvalidVertexReference => "Vertex index out of range",
            Self::CycleDetected => "Cycle detected in condensation graph",
            Self::DistanceOverflow => "Path distance overflowed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the path and read permissions, then rerun."),
            Self::InputMalformed => {
                Some("Expected {\"directed\", \"n\", \"edges\": [{\"u\",\"v\",\"w\"}], \"source\"}.")
            }
            Self::ConfigParseError => Some("Fix syntax in sccpath.toml and retry."),
            Self::InputTooLarge => Some("Split the graph or lower \"n\" below the vertex limit."),
            Self::InvalidVertexReference => {
                Some("Every edge endpoint and the source must lie in [0, n).")
            }
            Self::CycleDetected => Some("This is an internal bug; report it with the input file."),
            Self::DistanceOverflow => Some("Reduce edge weights so path sums fit in 64 bits."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What referenced a vertex that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRole {
    EdgeSource,
    EdgeTarget,
    PathSource,
    OrderEntry,
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EdgeSource => "edge source",
            Self::EdgeTarget => "edge target",
            Self::PathSource => "path source",
            Self::OrderEntry => "order entry",
        };
        f.write_str(label)
    }
}

/// Errors produced by graph construction, loading and analysis.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A vertex index fell outside `[0, vertex_count)`.
    #[error("{role} {vertex} is out of range for a graph with {vertex_count} vertices")]
    InvalidVertexReference {
        role: VertexRole,
        vertex: usize,
        vertex_count: usize,
    },

    /// The document declared more vertices than can be allocated.
    #[error("graph declares {vertex_count} vertices; the limit is {limit}")]
    TooManyVertices { vertex_count: usize, limit: usize },

    /// The topological sort reached a vertex that was still in progress.
    #[error("cycle detected at vertex {vertex}; no topological order exists")]
    CycleDetected { vertex: usize },

    /// A relaxed distance left the `i64` range.
    #[error("distance overflow relaxing edge {from} -> {to}")]
    DistanceOverflow { from: usize, to: usize },

    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document was not valid JSON for a graph.
    #[error("malformed graph document: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl GraphError {
    /// Map this error to its stable [`ErrorCode`].
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidVertexReference { .. } => ErrorCode::InvalidVertexReference,
            Self::TooManyVertices { .. } => ErrorCode::InputTooLarge,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::DistanceOverflow { .. } => ErrorCode::DistanceOverflow,
            Self::Io { .. } => ErrorCode::InputUnreadable,
            Self::Malformed(_) => ErrorCode::InputMalformed,
        }
    }

    /// Remediation text for this error, falling back to the code message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
