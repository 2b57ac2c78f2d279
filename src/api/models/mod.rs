pub mod common;
pub mod users;

pub use common::*;
pub use users::*;
