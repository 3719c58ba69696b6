use super::raw::RawTaskRecord;
use super::task::{Priority, Sentiment, Task, TaskStatus};

/// The backend's marker for "intentionally absent".
const SENTINEL: &str = "NA";

/// Normalize one backend record. Never fails: missing fields become empty or `None`.
pub fn transform(raw: &RawTaskRecord) -> Task {
    Task {
        id: raw.id.clone().unwrap_or_default(),
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        priority: raw
            .priority
            .as_deref()
            .map(Priority::from_label)
            .unwrap_or_default(),
        status: TaskStatus::Todo,
        due_date: present(raw.due_at.as_deref()),
        created_at: raw.created_at.clone(),
        assignee: raw.sender_name.clone(),
        category: raw
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        sentiment: raw.sentiment.as_deref().map(Sentiment::from_label),
        sender_name: raw.sender_name.clone(),
        sender_email: raw.sender_email.clone(),
        action_link: present(raw.action_url.as_deref()),
        message_id: raw.message_id.clone(),
        tags: split_tags(raw.tags.as_deref()),
        important: truthy(raw.is_important.as_deref()),
        completed: truthy(raw.is_completed.as_deref()),
        kind: raw.kind.clone(),
    }
}

pub fn transform_all(records: &[RawTaskRecord]) -> Vec<Task> {
    records.iter().map(transform).collect()
}

/// A one-task list shown when the listing endpoint is unreachable.
pub fn fallback_tasks() -> Vec<Task> {
    let mut task = Task::new("sample-1", "Review your inbox");
    task.description =
        "MailSync could not load your tasks. This placeholder is shown until the next successful refresh."
            .to_string();
    task.priority = Priority::Medium;
    task.category = Some("Inbox".to_string());
    task.sentiment = Some(Sentiment::Neutral);
    vec![task]
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| {
            let v = v.trim();
            !v.is_empty() && !v.eq_ignore_ascii_case(SENTINEL)
        })
        .map(str::to_string)
}

fn split_tags(value: Option<&str>) -> Vec<String> {
    value
        .map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}
