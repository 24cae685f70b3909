//! Plausible sample values for pre-filling forms

use chrono::NaiveDate;
use conduit_core::{ActionSchema, FieldDescriptor, FieldKind, FormValues};
use serde_json::{json, Value as JsonValue};

const SAMPLE_PROSE: &str = "This is a sample description created in demo mode for testing purposes.";

fn has_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| name.contains(n))
}

/// Sample value for one field; `today` feeds date fields
pub fn generate(field: &FieldDescriptor, today: NaiveDate) -> JsonValue {
    let name = field.name.to_lowercase();
    let name = name.as_str();
    let numeric = |n: i64| {
        if field.kind == FieldKind::Number {
            json!(n)
        } else {
            json!(n.to_string())
        }
    };

    if name.contains("email") {
        return json!("demo@example.com");
    }
    if has_any(name, &["phone", "mobile", "cell"]) {
        return json!("+1-555-0123");
    }
    if has_any(name, &["firstname", "first_name"]) || name == "first" {
        return json!("Jane");
    }
    if has_any(name, &["lastname", "last_name"]) || name == "last" {
        return json!("Smith");
    }
    if has_any(name, &["fullname", "full_name"]) || name == "name" {
        return json!("Jane Smith");
    }
    if name.contains("company") && !name.contains("id") {
        return json!("Acme Corporation");
    }
    if has_any(name, &["title", "position", "job"]) {
        return json!("Product Manager");
    }
    if name.contains("address") {
        return json!("123 Main Street");
    }
    if name.contains("city") {
        return json!("San Francisco");
    }
    if has_any(name, &["state", "province"]) {
        return json!("California");
    }
    if has_any(name, &["zip", "postal"]) {
        return json!("94102");
    }
    if name.contains("country") {
        return json!("United States");
    }
    if has_any(name, &["website", "url", "domain"]) {
        return json!("https://example.com");
    }
    if has_any(name, &["description", "note", "comment", "message"]) {
        return json!(SAMPLE_PROSE);
    }
    if has_any(name, &["amount", "price", "revenue", "value", "budget"]) {
        return numeric(50000);
    }
    if has_any(name, &["quantity", "qty", "count"]) {
        return numeric(10);
    }

    match field.kind {
        FieldKind::Date => json!(today.format("%Y-%m-%d").to_string()),
        FieldKind::Number => json!(100),
        FieldKind::Select => json!(""),
        _ if field.is_array => json!(r#"["example1", "example2"]"#),
        _ => json!(format!("Sample {}", field.display_name)),
    }
}

/// Demo values for every field except selects with a fixed option list
pub fn autofill(schema: &ActionSchema, today: NaiveDate) -> FormValues {
    schema
        .all_fields()
        .filter(|f| !f.has_fixed_options())
        .map(|f| (f.name.clone(), generate(f, today)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::{FieldLocation, HttpMethod, SelectOption};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn field(name: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(name, "Thing", kind, FieldLocation::Body)
    }

    #[test]
    fn test_name_cascade() {
        let cases = [
            ("user.email", "demo@example.com"),
            ("mobile_number", "+1-555-0123"),
            ("firstName", "Jane"),
            ("last", "Smith"),
            ("name", "Jane Smith"),
            ("company_name", "Acme Corporation"),
            ("job_title", "Product Manager"),
            ("billing_address", "123 Main Street"),
            ("city", "San Francisco"),
            ("province", "California"),
            ("postal_code", "94102"),
            ("country", "United States"),
            ("homepage_url", "https://example.com"),
            ("internal_note", SAMPLE_PROSE),
        ];
        for (name, expected) in cases {
            assert_eq!(generate(&field(name, FieldKind::String), today()), json!(expected), "{}", name);
        }
    }

    #[test]
    fn test_email_beats_address() {
        assert_eq!(generate(&field("email_address", FieldKind::String), today()), json!("demo@example.com"));
    }

    #[test]
    fn test_numeric_names_follow_kind() {
        assert_eq!(generate(&field("deal_amount", FieldKind::Number), today()), json!(50000));
        assert_eq!(generate(&field("deal_amount", FieldKind::String), today()), json!("50000"));
        assert_eq!(generate(&field("qty", FieldKind::Number), today()), json!(10));
        assert_eq!(generate(&field("count", FieldKind::String), today()), json!("10"));
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(generate(&field("due", FieldKind::Date), today()), json!("2024-03-09"));
        assert_eq!(generate(&field("size", FieldKind::Number), today()), json!(100));
        assert_eq!(generate(&field("mode", FieldKind::Select), today()), json!(""));
        assert_eq!(
            generate(&field("tags", FieldKind::Textarea).as_array(), today()),
            json!(r#"["example1", "example2"]"#)
        );
        assert_eq!(generate(&field("foo", FieldKind::String), today()), json!("Sample Thing"));
    }

    #[test]
    fn test_autofill_skips_fixed_selects() {
        let mut schema = ActionSchema::empty(HttpMethod::Post);
        schema.body_fields = vec![
            field("email", FieldKind::String),
            field("status", FieldKind::Select)
                .with_options(vec![SelectOption::new("open", "Open")]),
        ];

        let values = autofill(&schema, today());
        assert_eq!(values.len(), 1);
        assert_eq!(values["email"], json!("demo@example.com"));
    }
}
