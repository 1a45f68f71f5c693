use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::models::Vector;

/// Fixed id of the probe vector
pub const PROBE_VECTOR_ID: &str = "namespace-test-vector";

/// Build the throwaway vector used to materialise and check a namespace.
///
/// Values are uniform in `[0, 1)`; metadata marks the record as a test
/// artifact with a UTC creation timestamp.
pub fn probe_vector(dimension: usize) -> Vector {
    let values: Vec<f32> = (0..dimension).map(|_| rand::random::<f32>()).collect();

    Vector::new(PROBE_VECTOR_ID, values).with_metadata(json!({
        "project": "test",
        "type": "test",
        "source": "namespace-creation",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_vector_shape() {
        let probe = probe_vector(1536);
        assert_eq!(probe.id, PROBE_VECTOR_ID);
        assert_eq!(probe.values.len(), 1536);
        assert!(probe.values.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_probe_metadata_tags() {
        let probe = probe_vector(4);
        let metadata = probe.metadata.unwrap();
        assert_eq!(metadata["project"], "test");
        assert_eq!(metadata["type"], "test");
        assert_eq!(metadata["source"], "namespace-creation");

        let timestamp = metadata["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'), "timestamp should be UTC: {timestamp}");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_probe_vectors_are_random() {
        assert_ne!(probe_vector(32).values, probe_vector(32).values);
    }
}
