pub mod column;
pub mod error;
pub mod table;
