//! Shared shape of a parsed catalog type such as `decimal(10,2) unsigned`.

use lazy_static::lazy_static;
use model::core::abstract_type::AbstractType;
use regex::Regex;

lazy_static! {
    static ref NATIVE_TYPE: Regex = Regex::new(r"^(\w+)(?:\(([^)]+)\))?").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    pub column_type: AbstractType,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub enum_values: Vec<String>,
    pub unsigned: bool,
}

impl NativeType {
    pub fn new(column_type: AbstractType) -> Self {
        Self {
            column_type,
            size: None,
            precision: None,
            scale: None,
            enum_values: Vec::new(),
            unsigned: false,
        }
    }

    /// Fills size, precision and scale from a `p[,s]` argument list.
    pub fn with_dimensions(mut self, args: &str) -> Self {
        let mut parts = args.split(',').map(|p| p.trim().parse::<u32>().ok());
        if let Some(first) = parts.next().flatten() {
            self.size = Some(first);
            self.precision = Some(first);
        }
        if let Some(scale) = parts.next().flatten() {
            self.scale = Some(scale);
        }
        self
    }
}

/// Splits a native type into its leading word and the contents of the first
/// parenthesized group.
pub fn split_native_type(native: &str) -> Option<(String, Option<String>)> {
    let caps = NATIVE_TYPE.captures(native.trim())?;
    Some((
        caps[1].to_string(),
        caps.get(2).map(|m| m.as_str().to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_arguments() {
        assert_eq!(
            split_native_type("decimal(10,2) unsigned"),
            Some(("decimal".into(), Some("10,2".into())))
        );
        assert_eq!(split_native_type("int"), Some(("int".into(), None)));
        assert_eq!(split_native_type("(x)"), None);
    }

    #[test]
    fn dimensions() {
        let t = NativeType::new(AbstractType::Decimal).with_dimensions("10, 2");
        assert_eq!((t.size, t.precision, t.scale), (Some(10), Some(10), Some(2)));

        let t = NativeType::new(AbstractType::String).with_dimensions("255");
        assert_eq!((t.size, t.scale), (Some(255), None));
    }
}
