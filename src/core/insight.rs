use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One labelled bar of an insight chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Dashboard metrics computed server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub meeting_count: u64,
    pub tasks_completed: u64,
    pub total_email: u64,
    pub categories: Vec<LabelCount>,
    pub sentiments: Vec<LabelCount>,
}

const LABEL_KEYS: [&str; 4] = ["category", "sentiment", "name", "label"];
const COUNT_KEYS: [&str; 3] = ["count", "value", "total"];

impl Insights {
    /// Read the `data` object of the insight endpoint. Missing counters read as zero
    /// and list entries that carry no label are skipped.
    pub fn from_value(data: &Value) -> Self {
        Self {
            meeting_count: data.get("meetingcount").and_then(as_count).unwrap_or(0),
            tasks_completed: data.get("taskcompleted").and_then(as_count).unwrap_or(0),
            total_email: data.get("totalemail").and_then(as_count).unwrap_or(0),
            categories: label_counts(data.get("categorylist")),
            sentiments: label_counts(data.get("sentimentallist")),
        }
    }

    pub fn completion_ratio(&self) -> Option<f64> {
        if self.total_email == 0 {
            None
        } else {
            Some(self.tasks_completed as f64 / self.total_email as f64)
        }
    }
}

fn label_counts(list: Option<&Value>) -> Vec<LabelCount> {
    list.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(label_count).collect())
        .unwrap_or_default()
}

fn label_count(item: &Value) -> Option<LabelCount> {
    match item {
        Value::Object(map) => {
            let label = LABEL_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))?;
            let count = COUNT_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(as_count))
                .unwrap_or(0);
            Some(LabelCount { label: label.to_string(), count })
        }
        Value::Array(pair) => {
            let label = pair.first().and_then(Value::as_str)?;
            let count = pair.get(1).and_then(as_count).unwrap_or(0);
            Some(LabelCount { label: label.to_string(), count })
        }
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
