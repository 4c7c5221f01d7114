pub mod balances;
pub mod candidates;
pub mod executor;

pub use balances::{check_native_funding, fetch_balances, verify_decimals};
pub use candidates::{derive_candidates, possible_swaps};
pub use executor::SwapExecutor;
