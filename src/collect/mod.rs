pub mod balance;
pub mod collector;

pub use balance::ClassBalance;
pub use collector::{BalancedCollector, Collected};
