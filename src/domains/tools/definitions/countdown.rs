//! Countdown tool definition.
//!
//! Reports how many days are left until a date.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::info;

use crate::domains::tools::args::ToolArgs;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{ParamSpec, ParamType, Schema, ToolDescription};

pub struct CountdownTool;

impl CountdownTool {
    pub const NAME: &'static str = "countdown";

    pub const DESCRIPTION: &'static str = "Count the days from today until a given date.";

    const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Human-readable distance from `today` to `target`.
    pub fn describe_distance(today: NaiveDate, target: NaiveDate, label: Option<&str>) -> String {
        let what = label.map_or_else(|| target.format(Self::DATE_FORMAT).to_string(), str::to_string);
        let days = (target - today).num_days();

        match days {
            0 => format!("{what} is today"),
            1 => format!("1 day until {what}"),
            d if d > 1 => format!("{d} days until {what}"),
            -1 => format!("{what} was 1 day ago"),
            d => format!("{what} was {} days ago", -d),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for CountdownTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription::new(Self::NAME, Self::DESCRIPTION).with_parameters(
            Schema::new()
                .param("date", ParamSpec::required(ParamType::String, "Target date (YYYY-MM-DD)"))
                .param("label", ParamSpec::optional(ParamType::String, "Name of the occasion")),
        )
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let raw = args.get_str("date").context("Missing 'date' parameter")?;
        let target = NaiveDate::parse_from_str(raw, Self::DATE_FORMAT)
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?;
        let today = Local::now().date_naive();

        info!("Countdown from {} to {}", today, target);
        Ok(Value::String(Self::describe_distance(
            today,
            target,
            args.get_str("label"),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_distance_wording() {
        let today = date(2024, 9, 28);
        assert_eq!(
            CountdownTool::describe_distance(today, date(2024, 10, 1), Some("National Day")),
            "3 days until National Day"
        );
        assert_eq!(
            CountdownTool::describe_distance(today, date(2024, 9, 29), None),
            "1 day until 2024-09-29"
        );
        assert_eq!(CountdownTool::describe_distance(today, today, None), "2024-09-28 is today");
        assert_eq!(
            CountdownTool::describe_distance(today, date(2024, 9, 20), Some("launch")),
            "launch was 8 days ago"
        );
    }

    #[tokio::test]
    async fn test_invalid_date() {
        let args: ToolArgs = [("date".to_string(), json!("next friday"))].into_iter().collect();
        let err = CountdownTool.execute(args).await.unwrap_err();
        assert!(err.to_string().contains("next friday"));
    }

    #[tokio::test]
    async fn test_today() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let args: ToolArgs = [("date".to_string(), json!(today))].into_iter().collect();
        let result = CountdownTool.execute(args).await.unwrap();
        assert!(result.as_str().unwrap().ends_with("is today"));
    }
}
