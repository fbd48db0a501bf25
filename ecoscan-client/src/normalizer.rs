//! Classifier outcome normalization
//!
//! Every outcome, good or bad, becomes a [`ClassificationResult`]. Failures
//! collapse into one fixed sentinel; the failure detail is never copied into
//! the rendered fields.

use crate::classifier::{ClassifierResponse, ClassifyError};
use ecoscan_common::ClassificationResult;

pub const ERROR_NAME: &str = "Error";
pub const ERROR_CATEGORY: &str = "Could Not Connect 🔌";
pub const ERROR_CLASS_NAME: &str = "trash";
pub const ERROR_INSTRUCTIONS: &str = "Could not connect to the classification server. \
     Please make sure the backend is running and try again.";
pub const ERROR_TIP: &str = "Check that the classifier endpoint in your EcoScan config \
     (or ECOSCAN_ENDPOINT) points at a running server.";

/// Convert a classifier outcome into a renderable result
pub fn normalize(
    outcome: Result<ClassifierResponse, ClassifyError>,
) -> ClassificationResult {
    match outcome {
        Ok(response) => from_response(response),
        Err(_) => sentinel_result(),
    }
}

/// Map a response field-for-field; missing fields become empty strings
pub fn from_response(response: ClassifierResponse) -> ClassificationResult {
    ClassificationResult {
        name: response.name.unwrap_or_default(),
        category: response.category.unwrap_or_default(),
        class_name: response.class_name.unwrap_or_default(),
        instructions: response.instructions.unwrap_or_default(),
        tip: response.tip.unwrap_or_default(),
    }
}

/// The fixed result shown for any connectivity or protocol failure
pub fn sentinel_result() -> ClassificationResult {
    ClassificationResult {
        name: ERROR_NAME.to_string(),
        category: ERROR_CATEGORY.to_string(),
        class_name: ERROR_CLASS_NAME.to_string(),
        instructions: ERROR_INSTRUCTIONS.to_string(),
        tip: ERROR_TIP.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottle_response() -> ClassifierResponse {
        ClassifierResponse {
            name: Some("Plastic Bottle".to_string()),
            category: Some("Recycle ♻️".to_string()),
            class_name: Some("recycle".to_string()),
            instructions: Some("Empty the bottle, rinse it out.".to_string()),
            tip: Some("Recycling one plastic bottle saves energy.".to_string()),
        }
    }

    #[test]
    fn test_success_fields_copied_unchanged() {
        let result = normalize(Ok(bottle_response()));

        assert_eq!(result.name, "Plastic Bottle");
        assert_eq!(result.category, "Recycle ♻️");
        assert_eq!(result.class_name, "recycle");
        assert_eq!(result.instructions, "Empty the bottle, rinse it out.");
        assert_eq!(result.tip, "Recycling one plastic bottle saves energy.");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let result = normalize(Ok(ClassifierResponse {
            name: Some("Apple".to_string()),
            ..Default::default()
        }));

        assert_eq!(result.name, "Apple");
        assert_eq!(result.category, "");
        assert_eq!(result.class_name, "");
        assert_eq!(result.instructions, "");
        assert_eq!(result.tip, "");
    }

    #[test]
    fn test_every_failure_yields_sentinel() {
        let failures = vec![
            ClassifyError::Network("connection refused".to_string()),
            ClassifyError::Status(404),
            ClassifyError::Status(500),
            ClassifyError::Status(302),
            ClassifyError::Parse("expected value at line 1".to_string()),
            ClassifyError::Request("bad mime".to_string()),
        ];

        for failure in failures {
            let result = normalize(Err(failure));
            assert_eq!(result, sentinel_result());
            assert!(result.category.contains("Could Not Connect"));
            assert_eq!(result.class_name, "trash");
            assert_eq!(result.name, "Error");
        }
    }

    #[test]
    fn test_failure_detail_not_rendered() {
        let result = normalize(Err(ClassifyError::Network("secret-host:9999".to_string())));
        for field in [&result.name, &result.category, &result.instructions, &result.tip] {
            assert!(!field.contains("secret-host"));
        }
    }
}
