use crate::core::value::Value;
use indexmap::IndexMap;

/// Named parameter bag. Keys carry their leading colon (`:qp0`, `:id`) and
/// keep insertion order so the bag can also be bound positionally.
pub type Params = IndexMap<String, Value>;

/// Merges `overrides` on top of `base`; on a key collision the value from
/// `overrides` wins.
pub fn merge_params(base: &Params, overrides: &Params) -> Params {
    let mut merged = base.clone();
    for (name, value) in overrides {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Normalizes a parameter name so it always starts with a colon.
pub fn param_name(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_writer_wins() {
        let mut base = Params::new();
        base.insert(":a".into(), Value::Int(1));
        base.insert(":b".into(), Value::Int(2));

        let mut overrides = Params::new();
        overrides.insert(":b".into(), Value::Int(20));
        overrides.insert(":c".into(), Value::Int(3));

        let merged = merge_params(&base, &overrides);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[":b"], Value::Int(20));
        assert_eq!(
            merged.keys().map(String::as_str).collect::<Vec<_>>(),
            vec![":a", ":b", ":c"]
        );
    }

    #[test]
    fn param_names_gain_a_colon() {
        assert_eq!(param_name("id"), ":id");
        assert_eq!(param_name(":id"), ":id");
    }
}
