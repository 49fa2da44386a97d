//! Deployment export decoding
//!
//! Turns the body of `GET /api/stacks/{org}/{project}/{stack}/export` into
//! [`StackOutputs`]. Decoding happens in two passes: the body is parsed as
//! JSON first, so malformed text is a decode error, and the tree is then
//! deserialized into the typed structs below, where any missing or ill-typed
//! field is a shape error.

use super::stack::StackIdentifier;
use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top level of a deployment export
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentExport {
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub deployment: Option<Deployment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub resources: Option<Vec<ExportedResource>>,
}

/// One node of the exported resource graph; fields other than these are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct ExportedResource {
    #[serde(default)]
    pub urn: Option<String>,
    /// Only required to be an object on the stack's root resource
    #[serde(default)]
    pub outputs: Option<Value>,
}

/// Outputs of a stack's root resource together with the export version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackOutputs {
    pub version: i64,
    pub outputs: BTreeMap<String, String>,
}

/// Decode an export body and extract the outputs for `id`
pub fn parse_export(body: &str, id: &StackIdentifier) -> Result<StackOutputs> {
    let tree: Value = serde_json::from_str(body)?;
    if !tree.is_object() {
        return Err(FetchError::shape("export is not a JSON object"));
    }

    let export = DeploymentExport::deserialize(tree)
        .map_err(|e| FetchError::shape(e.to_string()))?;

    let resources = export
        .deployment
        .ok_or_else(|| FetchError::shape("missing `deployment`"))?
        .resources
        .ok_or_else(|| FetchError::shape("missing `deployment.resources`"))?;

    let outputs = find_stack_outputs(&resources, &id.stack_urn())?;
    if outputs.is_none() {
        tracing::warn!("No stack resource found for {}", id);
    }

    let version = export
        .version
        .ok_or_else(|| FetchError::shape("missing `version`"))?;
    if !version.is_finite() {
        return Err(FetchError::shape("`version` is not a finite number"));
    }

    Ok(StackOutputs {
        version: version as i64,
        outputs: outputs.unwrap_or_default(),
    })
}

/// Scan `resources` in order for the record whose URN is `expected_urn`
///
/// A later duplicate overrides an earlier one. Returns `None` when nothing matches.
pub fn find_stack_outputs(
    resources: &[ExportedResource],
    expected_urn: &str,
) -> Result<Option<BTreeMap<String, String>>> {
    let mut found = None;

    for (index, resource) in resources.iter().enumerate() {
        let urn = resource
            .urn
            .as_deref()
            .ok_or_else(|| FetchError::shape(format!("resource {} has no `urn`", index)))?;

        tracing::debug!("Found URN: {}", urn);

        if urn == expected_urn {
            let outputs = match &resource.outputs {
                Some(Value::Object(outputs)) => outputs,
                Some(_) => {
                    return Err(FetchError::shape(format!(
                        "stack resource {} has non-object `outputs`",
                        urn
                    )))
                }
                None => {
                    return Err(FetchError::shape(format!(
                        "stack resource {} has no `outputs`",
                        urn
                    )))
                }
            };
            found = Some(collapse_outputs(outputs));
        }
    }

    Ok(found)
}

fn collapse_outputs(outputs: &Map<String, Value>) -> BTreeMap<String, String> {
    outputs
        .iter()
        .map(|(key, value)| (key.clone(), collapse_value(value)))
        .collect()
}

/// Render an output value as the string stored in the outputs map
pub fn collapse_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prod() -> StackIdentifier {
        StackIdentifier::new("acme", "infra", "prod").unwrap()
    }

    const PROD_URN: &str = "urn:pulumi:prod::infra::pulumi:pulumi:Stack::infra-prod";

    #[test]
    fn test_single_matching_resource() {
        let body = json!({
            "version": 5,
            "deployment": {"resources": [
                {"urn": PROD_URN, "outputs": {"url": "https://x"}}
            ]}
        });

        let result = parse_export(&body.to_string(), &prod()).unwrap();
        assert_eq!(result.version, 5);
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.outputs["url"], "https://x");
    }

    #[test]
    fn test_skips_other_resources() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [
                {"urn": "urn:pulumi:prod::infra::aws:s3/bucket:Bucket::site", "outputs": {"arn": "a"}},
                {"urn": PROD_URN, "outputs": {"bucket": "site-123"}},
                {"urn": "urn:pulumi:prod::infra::pulumi:providers:aws::default"}
            ]}
        });

        let result = parse_export(&body.to_string(), &prod()).unwrap();
        assert_eq!(result.outputs, BTreeMap::from([("bucket".to_string(), "site-123".to_string())]));
    }

    #[test]
    fn test_no_match_returns_empty_outputs() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [
                {"urn": "urn:pulumi:dev::infra::pulumi:pulumi:Stack::infra-dev", "outputs": {"a": "b"}}
            ]}
        });

        let result = parse_export(&body.to_string(), &prod()).unwrap();
        assert_eq!(result.version, 3);
        assert!(result.outputs.is_empty());
    }

    #[test]
    fn test_last_match_wins() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [
                {"urn": PROD_URN, "outputs": {"url": "first", "only_first": "1"}},
                {"urn": PROD_URN, "outputs": {"url": "second"}}
            ]}
        });

        let result = parse_export(&body.to_string(), &prod()).unwrap();
        assert_eq!(result.outputs, BTreeMap::from([("url".to_string(), "second".to_string())]));
    }

    #[test]
    fn test_missing_deployment_is_shape_error() {
        let err = parse_export(r#"{"version": 3}"#, &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_non_object_deployment_is_shape_error() {
        let err = parse_export(r#"{"version": 3, "deployment": "nope"}"#, &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_missing_resources_is_shape_error() {
        let err = parse_export(r#"{"version": 3, "deployment": {}}"#, &prod()).unwrap_err();
        match err {
            FetchError::Shape { message } => assert!(message.contains("resources")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_version_is_shape_error() {
        let err = parse_export(r#"{"deployment": {"resources": []}}"#, &prod()).unwrap_err();
        match err {
            FetchError::Shape { message } => assert!(message.contains("version")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_string_version_is_shape_error() {
        let body = r#"{"version": "3", "deployment": {"resources": []}}"#;
        let err = parse_export(body, &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_fractional_version_truncates() {
        let body = r#"{"version": 3.7, "deployment": {"resources": []}}"#;
        assert_eq!(parse_export(body, &prod()).unwrap().version, 3);
    }

    #[test]
    fn test_non_root_outputs_of_any_type_are_ignored() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [
                {"urn": PROD_URN, "outputs": {"url": "https://x"}},
                {"urn": "urn:pulumi:prod::infra::aws:s3/bucket:Bucket::site", "outputs": "opaque"},
                {"urn": "urn:pulumi:prod::infra::aws:s3/bucket:Bucket::logs", "outputs": [1, 2]}
            ]}
        });

        let result = parse_export(&body.to_string(), &prod()).unwrap();
        assert_eq!(result.outputs, BTreeMap::from([("url".to_string(), "https://x".to_string())]));
    }

    #[test]
    fn test_matching_resource_with_non_object_outputs_is_shape_error() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [{"urn": PROD_URN, "outputs": "opaque"}]}
        });
        let err = parse_export(&body.to_string(), &prod()).unwrap_err();
        match err {
            FetchError::Shape { message } => assert!(message.contains("non-object")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resource_without_urn_is_shape_error() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [{"outputs": {}}]}
        });
        let err = parse_export(&body.to_string(), &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_matching_resource_without_outputs_is_shape_error() {
        let body = json!({
            "version": 3,
            "deployment": {"resources": [{"urn": PROD_URN}]}
        });
        let err = parse_export(&body.to_string(), &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = parse_export("{\"version\": ", &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
    }

    #[test]
    fn test_non_object_body_is_shape_error() {
        let err = parse_export("[1, 2]", &prod()).unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn test_collapse_value() {
        assert_eq!(collapse_value(&json!("s")), "s");
        assert_eq!(collapse_value(&json!(42)), "42");
        assert_eq!(collapse_value(&json!(2.5)), "2.5");
        assert_eq!(collapse_value(&json!(true)), "true");
        assert_eq!(collapse_value(&Value::Null), "");
        assert_eq!(collapse_value(&json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(collapse_value(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }
}
