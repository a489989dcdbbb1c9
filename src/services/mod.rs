mod plaid;

pub use plaid::*;
