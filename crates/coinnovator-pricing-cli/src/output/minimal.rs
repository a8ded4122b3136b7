use serde_json::Value;

use super::{format_scalar, result_of};

/// Print just the headline figure: the total fee of a breakdown (member
/// price when one applies), the verdict of a validation, or one
/// `label: price` line per member price line.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);
    let Value::Object(map) = result else {
        println!("{}", format_scalar(result));
        return;
    };

    if let Some(total) = map.get("total_fee") {
        let member_total = map
            .get("member_pricing")
            .and_then(|m| m.get("total_fee"))
            .filter(|v| !v.is_null());
        println!("{}", format_scalar(member_total.unwrap_or(total)));
        return;
    }

    if let Some(Value::Bool(valid)) = map.get("is_valid") {
        println!("{}", if *valid { "valid" } else { "invalid" });
        if let Some(Value::Array(errors)) = map.get("errors") {
            for e in errors {
                println!("  - {}", format_scalar(e));
            }
        }
        return;
    }

    if let Some(Value::Array(lines)) = map.get("lines") {
        for line in lines {
            println!(
                "{}: {}",
                line.get("label").map(format_scalar).unwrap_or_default(),
                line.get("member_price").map(format_scalar).unwrap_or_default(),
            );
        }
        return;
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_scalar(val));
    }
}
