//! Token registry, selection, and ERC20 helpers.
//!
//! # Example
//!
//! ```rust,no_run
//! use coffee_kit::*;
//!
//! # async fn example() -> Result<(), coffee_kit::Error> {
//! let coffee = Coffee::mainnet().build();
//!
//! // Fetched once, then cached
//! for token in coffee.registry().tokens().await? {
//!     println!("{} has {} decimals", token.symbol, token.decimals);
//! }
//!
//! let mut selector = TokenSelector::new();
//! selector.load(coffee.registry()).await?;
//! let vtho = selector.select("0x0000000000000000000000000000456e65726779")?;
//! # Ok(())
//! # }
//! ```

pub mod erc20;
mod registry;
mod selector;
mod types;

pub use registry::{DEFAULT_REGISTRY_URL, TokenRegistry, parse_registry};
pub use selector::{TokenOption, TokenSelector};
pub use types::Token;
