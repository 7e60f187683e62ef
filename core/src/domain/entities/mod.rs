pub mod principal;
pub mod token;

pub use principal::Principal;
pub use token::{Claims, TokenPair};
