pub mod data_type;
pub mod executor;
pub mod introspector;
pub mod params;
