use super::{LedgerError, PositionStore};
use crate::domain::Positions;

/// Volatile store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    positions: Positions,
}

impl InMemoryStore {
    pub fn new(positions: Positions) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }
}

impl PositionStore for InMemoryStore {
    fn load(&self) -> Positions {
        self.positions.clone()
    }

    fn save(&mut self, positions: &Positions) -> Result<(), LedgerError> {
        self.positions = positions.clone();
        Ok(())
    }
}
