#[cfg(test)]
mod tests {
    use crate::client::{string_field, string_value, timestamp_value, Document};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn mentor_document(fields: serde_json::Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/mentors/m1",
            "fields": fields,
            "updateTime": "2025-06-01T12:00:00.000000Z"
        }))
        .unwrap()
    }

    #[test]
    fn string_field_reads_typed_wrapper() {
        let doc = mentor_document(json!({
            "stripeAccountId": {"stringValue": "acct_1A2b3C"},
            "displayName": {"stringValue": "Ada"}
        }));
        assert_eq!(string_field(&doc, "stripeAccountId"), Some("acct_1A2b3C"));
        assert_eq!(string_field(&doc, "displayName"), Some("Ada"));
    }

    #[test]
    fn string_field_is_none_for_missing_or_other_types() {
        let doc = mentor_document(json!({
            "sessionCount": {"integerValue": "42"}
        }));
        assert_eq!(string_field(&doc, "stripeAccountId"), None);
        assert_eq!(string_field(&doc, "sessionCount"), None);
    }

    #[test]
    fn document_without_fields_deserializes() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/mentors/m2"
        }))
        .unwrap();
        assert!(doc.fields.is_empty());
        assert!(doc.update_time.is_none());
    }

    #[test]
    fn value_builders_produce_firestore_wrappers() {
        assert_eq!(
            string_value("acct_123"),
            json!({"stringValue": "acct_123"})
        );

        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let wrapped = timestamp_value(at);
        let ts = wrapped
            .get("timestampValue")
            .and_then(|v| v.as_str())
            .unwrap();
        assert!(ts.starts_with("2025-06-01T12:00:00"));
        assert!(ts.ends_with('Z'));
    }
}
