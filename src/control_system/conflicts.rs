use crate::errors::SchedulerError;
use crate::network::MovementId;

/// Symmetric conflict relation over a fixed universe of movements.
///
/// The matrix dimension is fixed at construction to the number of registered
/// movements and is indexed directly by [`MovementId`], which is a dense
/// arena index. Once the engine is built the graph is never mutated again.
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    dimension: usize,
    /// Row-major `dimension * dimension` adjacency matrix.
    matrix: Vec<bool>,
}

impl ConflictGraph {
    /// Allocates an all-clear matrix over `dimension` movements.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            matrix: vec![false; dimension * dimension],
        }
    }

    fn index_of(&self, id: MovementId) -> Result<usize, SchedulerError> {
        if id.0 < self.dimension {
            Ok(id.0)
        } else {
            Err(SchedulerError::IdentityNotFound(format!(
                "movement #{} is not in the conflict universe",
                id.0
            )))
        }
    }

    /// Declares that `a` and `b` must never be active together. Sets both
    /// directions; re-declaring an existing conflict is a no-op.
    pub fn declare(&mut self, a: MovementId, b: MovementId) -> Result<(), SchedulerError> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.matrix[a * self.dimension + b] = true;
        self.matrix[b * self.dimension + a] = true;
        Ok(())
    }

    /// Whether the two movements conflict. Symmetric by construction;
    /// movements outside the universe conflict with nothing.
    pub fn conflicts(&self, a: MovementId, b: MovementId) -> bool {
        if a.0 >= self.dimension || b.0 >= self.dimension {
            return false;
        }
        self.matrix[a.0 * self.dimension + b.0]
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
