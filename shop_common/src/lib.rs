mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use money::{Cents, CentsConversionError};
pub use secret::Secret;
