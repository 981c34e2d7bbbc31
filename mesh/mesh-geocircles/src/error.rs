//! Error types for geodesic circle computation.

use mesh_geodesic::GeodesicError;
use thiserror::Error;

/// Result type alias for geodesic circle operations.
pub type CirclesResult<T> = Result<T, CircleError>;

/// Errors that can occur during geodesic circle computation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircleError {
    /// Distance propagation failed.
    #[error(transparent)]
    Geodesic(#[from] GeodesicError),

    /// A parameter or input array is invalid.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The (masked) mesh has no area or no edges.
    #[error("degenerate mesh: {reason}")]
    DegenerateMesh {
        /// What makes the mesh degenerate.
        reason: String,
    },

    /// A face straddling a sampled radius touches a vertex the bounded
    /// propagation never reached.
    ///
    /// The distance limit (top of the sampled radius window plus the edge
    /// margin) was too small for this radius; raise `margin_edge_factor`.
    #[error("insufficient margin: vertex {vertex} unreached at radius {radius}")]
    InsufficientMargin {
        /// The unreached vertex.
        vertex: usize,
        /// The sampled radius.
        radius: f64,
        /// The distance value found on the vertex.
        distance: f64,
    },

    /// The circle around one query vertex could not be computed.
    #[error("circle around query vertex {vertex} failed: {source}")]
    Query {
        /// The query vertex whose computation failed.
        vertex: usize,
        /// What went wrong.
        source: Box<CircleError>,
    },
}

impl CircleError {
    /// Create an [`CircleError::InvalidArgument`] error.
    #[must_use]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a [`CircleError::DegenerateMesh`] error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateMesh {
            reason: reason.into(),
        }
    }

    /// Wrap this error with the query vertex it occurred for.
    #[must_use]
    pub fn for_query(self, vertex: usize) -> Self {
        Self::Query {
            vertex,
            source: Box::new(self),
        }
    }

    /// The query vertex this error occurred for, if any.
    #[must_use]
    pub const fn query(&self) -> Option<usize> {
        match self {
            Self::Query { vertex, .. } => Some(*vertex),
            _ => None,
        }
    }

    /// The underlying error, without query context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Query { source, .. } => source.root(),
            other => other,
        }
    }
}
