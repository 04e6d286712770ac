//! In-process store for tests and dry runs

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::observation::Observation;
use crate::Result;

#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Observation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `observations`
    pub fn with_observations(observations: Vec<Observation>) -> Self {
        Self {
            rows: RwLock::new(observations),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn append(&self, observation: &Observation) -> Result<()> {
        self.rows.write().await.push(observation.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Observation>> {
        Ok(self.rows.read().await.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
