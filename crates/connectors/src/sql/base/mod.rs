pub mod cache;
pub mod error;
pub mod executor;
pub mod introspector;
pub mod native_type;

#[cfg(test)]
pub(crate) mod stub;
