//! Shared bot context
//!
//! Built once at startup from the loaded configuration and shared by the
//! polling loop, the weekly scheduler and the status API.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use wsb_common::config::Config;
use wsb_common::{
    recap, weekly, Aggregator, EditionAnchor, Observation, PointsTable, Recap, RecordStore, Weekly,
};

pub struct BotContext {
    store: Arc<dyn RecordStore>,
    aggregator: Aggregator,
    anchor: EditionAnchor,
    top_n: usize,
}

impl BotContext {
    pub fn new(
        store: Arc<dyn RecordStore>,
        aggregator: Aggregator,
        anchor: EditionAnchor,
        top_n: usize,
    ) -> Self {
        Self {
            store,
            aggregator,
            anchor,
            top_n,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        let aggregator = Aggregator::new(PointsTable::standard(), config.leaderboard.dedup);
        info!(
            anchor_edition = config.anchor.edition,
            anchor_date = %config.anchor.date,
            top_n = config.leaderboard.top_n,
            dedup = ?config.leaderboard.dedup,
            "Scoring configured"
        );
        Self::new(store, aggregator, config.anchor, config.leaderboard.top_n)
    }

    pub fn points_table(&self) -> &PointsTable {
        self.aggregator.table()
    }

    pub fn describe_store(&self) -> String {
        self.store.describe()
    }

    /// Persist a freshly parsed score
    pub async fn record(&self, observation: &Observation) -> wsb_common::Result<()> {
        self.store.append(observation).await
    }

    /// Boards for the two most recent editions, `None` before any score exists
    pub async fn recap(&self) -> wsb_common::Result<Option<Recap>> {
        let observations = self.store.read_all().await?;
        Ok(recap(&self.aggregator, &observations, self.top_n))
    }

    /// Leaderboard for the seven editions ending the day before `today`
    pub async fn weekly(&self, today: NaiveDate) -> wsb_common::Result<Weekly> {
        let observations = self.store.read_all().await?;
        Ok(weekly(&self.aggregator, &self.anchor, &observations, today))
    }
}
