mod engagement;
mod ledger;

pub use engagement::EngagementError;
pub use ledger::LedgerError;
