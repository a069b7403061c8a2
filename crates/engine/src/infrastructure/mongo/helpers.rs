//! Conversions between wire JSON and stored bson, plus driver-error
//! classification into the domain taxonomy.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use mongodb::error::{
    ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT,
};
use serde_json::Value;

use pokedex_domain::DomainError;

const DUPLICATE_KEY: i32 = 11000;

/// Convert an inbound JSON object into a bson document.
pub fn value_to_document(value: &Value) -> Result<Document, DomainError> {
    mongodb::bson::to_document(value)
        .map_err(|e| DomainError::permanent(format!("document conversion failed: {e}")))
}

/// Render every store-native ObjectId as its hex string, at every
/// nesting depth, including inside arrays and nested documents.
pub fn stringify_object_ids(bson: Bson) -> Bson {
    match bson {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        Bson::Array(items) => Bson::Array(items.into_iter().map(stringify_object_ids).collect()),
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(key, value)| (key, stringify_object_ids(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Drop `_id` keys at every nesting depth. Used for joined
/// sub-documents whose opaque ids are not part of the response shape.
pub fn strip_document_ids(bson: Bson) -> Bson {
    match bson {
        Bson::Array(items) => Bson::Array(items.into_iter().map(strip_document_ids).collect()),
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .filter(|(key, _)| key != "_id")
                .map(|(key, value)| (key, strip_document_ids(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Stored document -> outbound JSON with ids rendered as strings.
pub fn document_to_json(doc: Document) -> Value {
    Value::from(stringify_object_ids(Bson::Document(doc)))
}

/// Parse a path-supplied store id.
pub fn parse_object_id(id: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse_str(id).map_err(|_| DomainError::permanent(format!("malformed object id: {id}")))
}

/// Render a store-assigned insert id as a plain string.
pub fn inserted_id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

/// Map a driver error into the domain taxonomy.
pub fn map_store_err(err: mongodb::error::Error) -> DomainError {
    if is_duplicate_key(&err) {
        DomainError::permanent(format!("unique constraint violation: {err}"))
    } else if is_transient(&err) {
        DomainError::transient(err.to_string())
    } else {
        DomainError::permanent(err.to_string())
    }
}

fn is_transient(err: &mongodb::error::Error) -> bool {
    if err.contains_label(TRANSIENT_TRANSACTION_ERROR)
        || err.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
    {
        return true;
    }
    matches!(
        err.kind.as_ref(),
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    )
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_bytes([byte; 12])
    }

    #[test]
    fn object_ids_become_strings_at_every_depth() {
        let id = oid(1);
        let nested = oid(2);
        let document = doc! {
            "_id": id,
            "trainerID": 1,
            "tags": [nested, "raw"],
            "meta": { "ref": nested },
        };

        let json = document_to_json(document);
        assert_eq!(json["_id"], json!(id.to_hex()));
        assert_eq!(json["trainerID"], json!(1));
        assert_eq!(json["tags"], json!([nested.to_hex(), "raw"]));
        assert_eq!(json["meta"]["ref"], json!(nested.to_hex()));
    }

    #[test]
    fn id_keys_are_stripped_recursively() {
        let document = doc! {
            "_id": oid(1),
            "pokemon": [
                { "_id": oid(2), "pokename": "Pikachu", "held": { "_id": oid(3), "name": "Berry" } },
            ],
        };

        let stripped = strip_document_ids(Bson::Document(document));
        let json = Value::from(stripped);
        assert!(json.get("_id").is_none());
        assert!(json["pokemon"][0].get("_id").is_none());
        assert_eq!(json["pokemon"][0]["pokename"], json!("Pikachu"));
        assert!(json["pokemon"][0]["held"].get("_id").is_none());
    }

    #[test]
    fn non_object_bodies_fail_document_conversion() {
        let err = value_to_document(&json!([1, 2, 3])).expect_err("arrays are not documents");
        assert!(matches!(err, DomainError::Permanent(_)));
    }

    #[test]
    fn malformed_object_ids_are_permanent_errors() {
        let err = parse_object_id("not-a-hex-id").expect_err("must reject");
        assert!(matches!(err, DomainError::Permanent(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn inserted_ids_render_as_plain_strings() {
        let id = oid(7);
        assert_eq!(inserted_id_string(Bson::ObjectId(id)), id.to_hex());
        assert_eq!(
            inserted_id_string(Bson::String("custom".into())),
            "custom".to_string()
        );
    }
}
