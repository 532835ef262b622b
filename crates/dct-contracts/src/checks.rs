//! The check-function registry: a keyed table of pure `(output, params)
//! -> CheckResult` functions. Unknown keys produce a typed error, not a
//! lookup panic.

use crate::contract::TaskContract;
use crate::error::{ContractError, Result};
use regex_lite::Regex;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckResult {
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            pass: true,
            details: None,
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            pass: false,
            details: Some(details.into()),
        }
    }
}

type CheckFn = Box<dyn Fn(&Value, &Value) -> CheckResult + Send + Sync>;

pub struct CheckFunctionRegistry {
    functions: HashMap<String, CheckFn>,
}

impl CheckFunctionRegistry {
    /// An empty registry with none of the built-ins loaded.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The default registry, preloaded with `equals`, `regex_match`,
    /// `numeric_range`, and `schema_shape`. This set is documented in
    /// SPEC_FULL.md §4.5 and must not grow or shrink silently.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("equals", equals_check);
        registry.register("regex_match", regex_match_check);
        registry.register("numeric_range", numeric_range_check);
        registry.register("schema_shape", schema_shape_check);
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value, &Value) -> CheckResult + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Box::new(f));
    }

    pub fn invoke(&self, name: &str, output: &Value, params: &Value) -> Result<CheckResult> {
        let f = self
            .functions
            .get(name)
            .ok_or_else(|| ContractError::UnknownCheckFunction(name.to_string()))?;
        Ok(f(output, params))
    }
}

impl Default for CheckFunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn equals_check(output: &Value, params: &Value) -> CheckResult {
    let expected = params.get("value").unwrap_or(params);
    if output == expected {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("expected {expected}, got {output}"))
    }
}

fn regex_match_check(output: &Value, params: &Value) -> CheckResult {
    let pattern = match params.get("pattern").and_then(Value::as_str) {
        Some(p) => p,
        None => return CheckResult::fail("missing `pattern` param"),
    };
    let text = match output.as_str() {
        Some(s) => s,
        None => return CheckResult::fail("output is not a string"),
    };
    match Regex::new(pattern) {
        Ok(re) if re.is_match(text) => CheckResult::pass(),
        Ok(_) => CheckResult::fail(format!("{text:?} does not match /{pattern}/")),
        Err(e) => CheckResult::fail(format!("invalid regex: {e}")),
    }
}

fn numeric_range_check(output: &Value, params: &Value) -> CheckResult {
    let n = match output.as_f64() {
        Some(n) => n,
        None => return CheckResult::fail("output is not a number"),
    };
    let min = params.get("min").and_then(Value::as_f64).unwrap_or(f64::NEG_INFINITY);
    let max = params.get("max").and_then(Value::as_f64).unwrap_or(f64::INFINITY);
    if n >= min && n <= max {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("{n} not in [{min}, {max}]"))
    }
}

fn schema_shape_check(output: &Value, params: &Value) -> CheckResult {
    let required = match params.get("required").and_then(Value::as_array) {
        Some(r) => r,
        None => return CheckResult::fail("missing `required` param"),
    };
    let obj = match output.as_object() {
        Some(o) => o,
        None => return CheckResult::fail("output is not an object"),
    };
    for key in required {
        let key = match key.as_str() {
            Some(k) => k,
            None => continue,
        };
        if !obj.contains_key(key) {
            return CheckResult::fail(format!("missing required key: {key}"));
        }
    }
    CheckResult::pass()
}

/// `verifyOutput`: resolves `contract.verification.name`, invokes it
/// with `output` and `contract.verification.params`.
pub fn verify_output(
    contract: &TaskContract,
    output: &Value,
    registry: &CheckFunctionRegistry,
) -> Result<CheckResult> {
    registry.invoke(&contract.verification.name, output, &contract.verification.params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_check_function_is_a_typed_error() {
        let registry = CheckFunctionRegistry::with_builtins();
        let err = registry
            .invoke("not_a_real_check", &json!(1), &json!({}))
            .unwrap_err();
        assert!(matches!(err, ContractError::UnknownCheckFunction(_)));
    }

    #[test]
    fn equals_passes_on_structural_equality() {
        let registry = CheckFunctionRegistry::with_builtins();
        let r = registry
            .invoke("equals", &json!({"a": 1}), &json!({"value": {"a": 1}}))
            .unwrap();
        assert!(r.pass);
    }

    #[test]
    fn regex_match_checks_the_output_string() {
        let registry = CheckFunctionRegistry::with_builtins();
        let r = registry
            .invoke("regex_match", &json!("hello-123"), &json!({"pattern": "^hello-\\d+$"}))
            .unwrap();
        assert!(r.pass);
        let r = registry
            .invoke("regex_match", &json!("nope"), &json!({"pattern": "^hello-\\d+$"}))
            .unwrap();
        assert!(!r.pass);
    }

    #[test]
    fn numeric_range_checks_inclusive_bounds() {
        let registry = CheckFunctionRegistry::with_builtins();
        let r = registry
            .invoke("numeric_range", &json!(5), &json!({"min": 1, "max": 10}))
            .unwrap();
        assert!(r.pass);
        let r = registry
            .invoke("numeric_range", &json!(11), &json!({"min": 1, "max": 10}))
            .unwrap();
        assert!(!r.pass);
    }

    #[test]
    fn schema_shape_requires_every_named_key() {
        let registry = CheckFunctionRegistry::with_builtins();
        let r = registry
            .invoke(
                "schema_shape",
                &json!({"a": 1, "b": 2}),
                &json!({"required": ["a", "b"]}),
            )
            .unwrap();
        assert!(r.pass);
        let r = registry
            .invoke(
                "schema_shape",
                &json!({"a": 1}),
                &json!({"required": ["a", "b"]}),
            )
            .unwrap();
        assert!(!r.pass);
    }

    #[test]
    fn custom_check_functions_can_be_registered() {
        let mut registry = CheckFunctionRegistry::empty();
        registry.register("always_pass", |_out, _params| CheckResult::pass());
        let r = registry.invoke("always_pass", &json!(null), &json!({})).unwrap();
        assert!(r.pass);
    }
}
