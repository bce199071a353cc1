use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::config::Config;
use crate::report::ProjectLedger;

mod commits;
mod designs;
mod payments;
mod phases;
mod profiles;
mod projects;

pub use payments::NewAdvance;
pub use projects::ShareStatus;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Every project of a profile with its phases and payments, for reports
    pub async fn load_ledgers(&self, profile_id: i32) -> Result<Vec<ProjectLedger>, sqlx::Error> {
        let projects = self.get_projects_by_profile(profile_id).await?;
        let phases = self.get_phases_by_profile(profile_id).await?;
        let payments = self.get_payments_by_profile(profile_id).await?;

        let mut ledgers: Vec<ProjectLedger> = projects
            .into_iter()
            .map(|project| ProjectLedger {
                project,
                phases: Vec::new(),
                payments: Vec::new(),
            })
            .collect();
        let index: HashMap<i32, usize> = ledgers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.project.id, i))
            .collect();

        for phase in phases {
            if let Some(&i) = index.get(&phase.project_id) {
                ledgers[i].phases.push(phase);
            }
        }
        for payment in payments {
            if let Some(&i) = index.get(&payment.project_id) {
                ledgers[i].payments.push(payment);
            }
        }

        Ok(ledgers)
    }
}

/// Initialize the database connection pool and bring the schema up to date
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    sqlx::migrate!().run(db.get_pool()).await?;
    tracing::info!("database migrations applied");

    Ok(db)
}
