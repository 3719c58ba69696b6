use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::column::FALLBACK_COLUMN_TITLE;
use super::task::{Sentiment, Task};

/// Local tallies over the current task list, for the summary view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub important: usize,
    pub completed: usize,
    pub overdue: usize,
    pub by_priority: BTreeMap<String, usize>,
    pub by_sentiment: BTreeMap<&'static str, usize>,
    pub by_category: BTreeMap<String, usize>,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            if task.important {
                stats.important += 1;
            }
            if task.completed {
                stats.completed += 1;
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            *stats
                .by_priority
                .entry(task.priority.label().to_string())
                .or_default() += 1;
            let sentiment = task.sentiment.unwrap_or(Sentiment::Unknown);
            *stats.by_sentiment.entry(sentiment.as_label()).or_default() += 1;
            let category = task.category.as_deref().unwrap_or(FALLBACK_COLUMN_TITLE);
            *stats.by_category.entry(category.to_string()).or_default() += 1;
        }
        stats
    }
}
