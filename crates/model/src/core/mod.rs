pub mod abstract_type;
pub mod params;
pub mod value;
