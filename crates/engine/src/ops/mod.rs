use sea_orm::DatabaseConnection;

use crate::allocation::DEFAULT_ALLOCATION_RATE_BPS;
use crate::ResultEngine;

mod goals;
mod transactions;

pub use transactions::{Statistics, TransactionListFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    allocation_rate_bps: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    allocation_rate_bps: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            allocation_rate_bps: DEFAULT_ALLOCATION_RATE_BPS,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the share of each income routed to goals, in basis points.
    /// Defaults to 1000 (10%).
    pub fn allocation_rate_bps(mut self, rate_bps: u32) -> EngineBuilder {
        self.allocation_rate_bps = rate_bps;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            allocation_rate_bps: self.allocation_rate_bps,
        })
    }
}
