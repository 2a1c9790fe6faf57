//! Sheet rows with free-form column names.

use serde_json::{Map, Value};

/// A sheet row keyed by column header, in column order.
pub type RawRecord = Map<String, Value>;

/// Case-insensitive column lookup.
///
/// Columns are scanned in row order and the first one whose name matches any
/// of `aliases` wins; the order of `aliases` does not matter.
pub fn resolve_field<'a>(row: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    let aliases: Vec<String> = aliases.iter().map(|a| a.to_lowercase()).collect();
    row.iter()
        .find(|(key, _)| aliases.contains(&key.to_lowercase()))
        .map(|(_, value)| value)
}

/// Whether a cell counts as "not filled in": null, false, zero or empty.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_field_case_insensitive() {
        let r = row(json!({"producto": "Tornillos", "CANTIDAD": 10}));
        assert_eq!(
            resolve_field(&r, &["Producto", "Product"]),
            Some(&json!("Tornillos"))
        );
        assert_eq!(resolve_field(&r, &["Cantidad", "Qty"]), Some(&json!(10)));
        assert_eq!(resolve_field(&r, &["Total"]), None);
    }

    #[test]
    fn test_resolve_field_row_order_wins() {
        // Both columns match; the one that appears first in the row is used
        let r = row(json!({"Qty": 3, "Cantidad": 7}));
        assert_eq!(resolve_field(&r, &["Cantidad", "Qty"]), Some(&json!(3)));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!("0")));
        assert!(!is_blank(&json!(12.5)));
    }
}
