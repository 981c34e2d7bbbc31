//! Error types for geodesic distance computation.

use thiserror::Error;

/// Result type for geodesic operations.
pub type GeodesicResult<T> = Result<T, GeodesicError>;

/// Errors that can occur during geodesic computation.
///
/// A disconnected mesh is deliberately *not* an error: vertices that cannot be
/// reached from the seeds read as unreached in the returned
/// [`DistanceField`](crate::DistanceField).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeodesicError {
    /// A seed, query or face vertex index is out of range.
    #[error("invalid vertex index: {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// The invalid index.
        index: usize,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// An argument is outside its valid range or has the wrong length.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The mesh cannot support geodesic computation.
    #[error("degenerate mesh: {reason}")]
    DegenerateMesh {
        /// What makes the mesh degenerate.
        reason: String,
    },
}

impl GeodesicError {
    /// Create an [`GeodesicError::InvalidArgument`] error.
    #[must_use]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a [`GeodesicError::DegenerateMesh`] error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateMesh {
            reason: reason.into(),
        }
    }

    /// Check a vertex index against the vertex count.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidIndex`] if `index >= vertex_count`.
    pub const fn check_index(index: usize, vertex_count: usize) -> GeodesicResult<()> {
        if index < vertex_count {
            Ok(())
        } else {
            Err(Self::InvalidIndex {
                index,
                vertex_count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = GeodesicError::InvalidIndex {
            index: 12,
            vertex_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "invalid vertex index: 12 (mesh has 8 vertices)"
        );

        let err = GeodesicError::invalid_argument("max_distance", "must not be NaN");
        assert_eq!(
            err.to_string(),
            "invalid argument `max_distance`: must not be NaN"
        );
    }

    #[test]
    fn check_index_bounds() {
        assert!(GeodesicError::check_index(7, 8).is_ok());
        assert!(matches!(
            GeodesicError::check_index(8, 8),
            Err(GeodesicError::InvalidIndex { index: 8, .. })
        ));
    }
}
