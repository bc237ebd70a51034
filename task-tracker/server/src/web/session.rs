use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// A database connection held exclusively for one request.
///
/// Handlers open a session once their input has been extracted and validated.
/// Calling [`Session::commit`] persists the work; dropping the session on any
/// other path rolls back and returns the connection to the pool.
pub struct Session {
    transaction: DatabaseTransaction,
}

impl Session {
    /// Checks a connection out of the pool and opens a transaction on it.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let transaction = db.begin().await?;
        Ok(Self { transaction })
    }

    /// Returns the connection to run queries on.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.transaction
    }

    /// Commits the request's work and releases the connection.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.transaction.commit().await
    }
}
