//! Error shared by the transaction, budget and goal repositories.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ledger repository adapters.
    pub enum LedgerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ledger repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ledger repository query failed: {message}",
    }
}
