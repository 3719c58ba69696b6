use serde_json::Value;

/// A mail/task record exactly as the MailSync backend returns it.
///
/// Every field is optional: the backend is loose about types (ids arrive as
/// numbers, markers as booleans or "0"/"1") and about presence, so building a
/// record never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTaskRecord {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub sentiment: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub tags: Option<String>,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub action_url: Option<String>,
    pub priority: Option<String>,
    pub is_important: Option<String>,
    pub message_id: Option<String>,
    pub is_completed: Option<String>,
    pub kind: Option<String>,
}

impl RawTaskRecord {
    /// Build a record from any JSON value. Non-objects yield an empty record.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(scalar_to_string);
        Self {
            id: field("id"),
            user_id: field("user_id"),
            category: field("category"),
            title: field("title"),
            sentiment: field("sentiment"),
            sender_name: field("sender_name"),
            sender_email: field("sender_email"),
            tags: field("tags"),
            created_at: field("created_at"),
            description: field("description"),
            due_at: field("due_at"),
            action_url: field("action_url"),
            priority: field("priority"),
            is_important: field("is_important"),
            message_id: field("message_id"),
            is_completed: field("is_completed"),
            kind: field("type"),
        }
    }

    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().map(Self::from_value).collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
