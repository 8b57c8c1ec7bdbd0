//! Weather tool: stub that returns a fixed report.
//!
//! Stands in for a real weather service; the constant template keeps the
//! tool-selection loop testable without another external dependency.

use async_trait::async_trait;
use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolOutcome};

pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The city to get the weather for"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let city = arguments["city"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'city' argument".into()))?;

        Ok(ToolOutcome::ok(format!(
            "The weather in {city} is 73 degrees and Sunny."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fixed_report() {
        let result = WeatherTool
            .execute(serde_json::json!({"city": "Bangalore"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.output,
            "The weather in Bangalore is 73 degrees and Sunny."
        );
    }

    #[tokio::test]
    async fn missing_city_is_invalid_arguments() {
        let err = WeatherTool
            .execute(serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
