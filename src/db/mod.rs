pub mod ledger;
pub mod migrations;

pub use ledger::Ledger;
