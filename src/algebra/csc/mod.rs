#![allow(non_snake_case)]

mod core;
pub use self::core::*;
mod triplet;
pub use triplet::*;
mod utils;
pub use utils::*;
mod ops;
pub use ops::*;
