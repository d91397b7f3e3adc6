#![allow(dead_code)]

pub mod builders;
pub mod strategies;
pub mod test_db;

pub use builders::*;
pub use test_db::*;
