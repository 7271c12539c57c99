use mongodb::bson::{self, doc, DateTime, Document};

use crate::{
    mongo_store::{configuration::Configuration, error::StoreError},
    session_record::SessionRecord,
    session_store::SessionKey,
};

/// Index keys for an ascending single-field index.
pub(crate) fn index_keys(field: &str) -> Document {
    let mut keys = Document::new();
    keys.insert(field, 1);
    keys
}

/// Matches the document stored for `session_key`.
pub(crate) fn filter(config: &Configuration, session_key: &SessionKey) -> Document {
    let mut filter = Document::new();
    filter.insert(config.token_field(), session_key.as_ref());
    filter
}

/// The `$set` update that upserts `record` and restamps the bookkeeping
/// fields. The bookkeeping fields replace record keys of the same name.
pub(crate) fn upsert(
    config: &Configuration,
    session_key: &SessionKey,
    record: &SessionRecord,
) -> Result<Document, StoreError> {
    let mut fields = Document::new();
    for (key, value) in record.iter() {
        let value = bson::to_bson(value).map_err(|e| {
            StoreError::ConversionError(format!("Unable to convert key \"{}\": {}", key, e))
        })?;
        fields.insert(key.clone(), value);
    }
    fields.insert(config.timestamp_field(), DateTime::now());
    fields.insert(config.token_field(), session_key.as_ref());
    Ok(doc! { "$set": fields })
}

/// Converts a stored document back into a record, keeping the bookkeeping
/// fields. Non-JSON values use relaxed extended JSON.
pub(crate) fn record(document: Document) -> SessionRecord {
    document
        .into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde_json::json;

    fn session_key() -> SessionKey {
        SessionKey::from("abc-123")
    }

    #[test]
    fn filter_matches_on_the_token_field() {
        let config = Configuration::default().with_token_field("sid");
        assert_eq!(filter(&config, &session_key()), doc! { "sid": "abc-123" });
    }

    #[test]
    fn upsert_sets_the_record_and_the_bookkeeping_fields() {
        let config = Configuration::default();
        let record: SessionRecord = [
            ("user_id".to_string(), json!("beavis")),
            ("visits".to_string(), json!(3)),
            ("roles".to_string(), json!(["admin"])),
        ]
        .into_iter()
        .collect();

        let update = upsert(&config, &session_key(), &record).expect("Unable to build update");
        let fields = update.get_document("$set").expect("Expected a $set document");

        assert_eq!(fields.get_str("user_id").ok(), Some("beavis"));
        assert_eq!(fields.get_i64("visits").ok(), Some(3));
        assert_eq!(
            fields.get_array("roles").ok(),
            Some(&vec![Bson::String("admin".to_string())])
        );
        assert_eq!(fields.get_str("session_id").ok(), Some("abc-123"));
        assert!(fields.get_datetime("_lib_created_at_").is_ok());
    }

    #[test]
    fn upsert_replaces_stale_bookkeeping_fields_from_the_record() {
        let config = Configuration::default();
        let record: SessionRecord = [
            ("session_id".to_string(), json!("someone-else")),
            ("_lib_created_at_".to_string(), json!({ "$date": "2001-01-01T00:00:00Z" })),
        ]
        .into_iter()
        .collect();

        let update = upsert(&config, &session_key(), &record).expect("Unable to build update");
        let fields = update.get_document("$set").expect("Expected a $set document");

        assert_eq!(fields.get_str("session_id").ok(), Some("abc-123"));
        assert!(fields.get_datetime("_lib_created_at_").is_ok());
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn record_keeps_every_field_of_the_document() {
        let document = doc! {
            "user_id": "beavis",
            "visits": 3_i32,
            "session_id": "abc-123",
        };

        let record = record(document);

        assert_eq!(record.get("user_id"), Some(&json!("beavis")));
        assert_eq!(record.get("visits"), Some(&json!(3)));
        assert_eq!(record.get("session_id"), Some(&json!("abc-123")));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn index_keys_are_ascending() {
        assert_eq!(index_keys("session_id"), doc! { "session_id": 1 });
    }
}
