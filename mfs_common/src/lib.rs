mod money;
mod secret;

pub mod helpers;

pub use money::{Money, MoneyParseError, DEFAULT_CURRENCY_CODE};
pub use secret::Secret;
