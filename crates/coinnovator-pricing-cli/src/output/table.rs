use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_of};

/// Fee lines of a breakdown, in display order, with the component key that
/// decides whether the engagement model charges them.
const FEE_LINES: [(&str, &str, Option<&str>); 4] = [
    ("Platform usage fee", "platform_usage_fee", Some("platform_usage")),
    ("Management fee", "management_fee", Some("management")),
    ("Consulting fee", "consulting_fee", Some("consulting")),
    ("Advance payment", "advance_payment", None),
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    let result = result_of(value);
    match result {
        Value::Object(map) if map.contains_key("included_components") => print_breakdown(map),
        Value::Object(map) if map.contains_key("lines") => print_member_lines(map),
        Value::Object(map) => print_fields(map),
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", format_scalar(other)),
    }
    print_envelope_notes(value);
}

fn print_breakdown(map: &Map<String, Value>) {
    let included: Vec<&str> = map
        .get("included_components")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let member = map.get("member_pricing").and_then(Value::as_object);

    let mut header = vec!["Fee", "Amount", "Charged"];
    if member.is_some() {
        header.push("Member price");
    }
    let mut builder = Builder::default();
    builder.push_record(header);

    for (label, key, component) in FEE_LINES {
        let charged = match component {
            Some(c) => if included.contains(&c) { "yes" } else { "no" },
            None => "",
        };
        let mut row = vec![label.to_string(), field(map, key), charged.to_string()];
        if let Some(m) = member {
            row.push(field(m, key));
        }
        builder.push_record(row);
    }

    let mut total = vec!["Total fee".to_string(), field(map, "total_fee"), String::new()];
    if let Some(m) = member {
        total.push(field(m, "total_fee"));
    }
    builder.push_record(total);
    println!("{}", Table::from(builder));

    println!(
        "\n{} | complexity {} (management x{}, consulting x{}) | solution fee {}",
        field(map, "engagement_model"),
        field(map, "complexity_level"),
        field(map, "management_multiplier"),
        field(map, "consulting_multiplier"),
        field(map, "solution_fee"),
    );
}

fn print_member_lines(map: &Map<String, Value>) {
    if let Some(Value::Array(lines)) = map.get("lines") {
        print_rows(lines);
    }
    println!(
        "\nActive member: {} | discount {}%",
        field(map, "is_active_member"),
        field(map, "discount_percentage"),
    );
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(row) = item {
            builder.push_record(headers.iter().map(|h| field(row, h)));
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(value: &Value) {
    let Some(envelope) = value.as_object() else {
        return;
    };
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map(format_scalar).unwrap_or_default()
}
