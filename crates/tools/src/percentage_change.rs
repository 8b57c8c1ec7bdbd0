//! Percentage change tool for the data analyst.

use async_trait::async_trait;
use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolOutcome};

/// Compute the percentage change from `start` to `end`.
///
/// Fails when `start` is zero, since the change is undefined there.
pub fn percentage_change(start: f64, end: f64) -> Result<f64, ToolError> {
    if start == 0.0 {
        return Err(ToolError::Arithmetic(
            "percentage change from a zero start value is undefined".into(),
        ));
    }
    Ok((end - start) / start * 100.0)
}

pub struct PercentageChangeTool;

#[async_trait]
impl Tool for PercentageChangeTool {
    fn name(&self) -> &str {
        "percentage_change"
    }

    fn description(&self) -> &str {
        "Compute the percentage change from a start value to an end value."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "start": {
                    "type": "number",
                    "description": "The starting value"
                },
                "end": {
                    "type": "number",
                    "description": "The ending value"
                }
            },
            "required": ["start", "end"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let start = arguments["start"]
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'start' argument".into()))?;
        let end = arguments["end"]
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'end' argument".into()))?;

        match percentage_change(start, end) {
            Ok(value) => {
                // Format nicely: remove trailing .0 for integers.
                let formatted = if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", value as i64)
                } else {
                    format!("{value}")
                };
                Ok(ToolOutcome::ok(formatted))
            }
            Err(e) => Ok(ToolOutcome::failed(format!("Error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase() {
        assert_eq!(percentage_change(100.0, 150.0).unwrap(), 50.0);
    }

    #[test]
    fn decrease() {
        assert_eq!(percentage_change(100.0, 50.0).unwrap(), -50.0);
    }

    #[test]
    fn zero_start_is_arithmetic_error() {
        let err = percentage_change(0.0, 10.0).unwrap_err();
        assert!(matches!(err, ToolError::Arithmetic(_)));
    }

    #[tokio::test]
    async fn tool_execute() {
        let result = PercentageChangeTool
            .execute(serde_json::json!({"start": 100, "end": 150}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "50");
    }

    #[tokio::test]
    async fn tool_formats_decimals() {
        let result = PercentageChangeTool
            .execute(serde_json::json!({"start": 3, "end": 4}))
            .await
            .unwrap();
        assert!(result.output.starts_with("33.33"));
    }

    #[tokio::test]
    async fn tool_zero_start_fails_without_aborting() {
        let result = PercentageChangeTool
            .execute(serde_json::json!({"start": 0, "end": 10}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("Arithmetic error"));
    }

    #[tokio::test]
    async fn tool_missing_argument() {
        let result = PercentageChangeTool
            .execute(serde_json::json!({"start": 100}))
            .await;
        assert!(result.is_err());
    }
}
