mod helpers;
mod token_amount;

pub mod op;

pub use helpers::parse_boolean_flag;
pub use token_amount::{TokenAmount, TokenAmountError, TOKEN_DECIMALS};
