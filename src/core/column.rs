use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::task::Task;

pub const FALLBACK_COLUMN_TITLE: &str = "Uncategorized";

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A kanban lane: every task sharing one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskColumn {
    pub id: String,
    pub title: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Group tasks into one column per distinct category, each sorted newest first.
///
/// Columns keep the order in which their category first appears. Tasks without a
/// category land in a trailing "Uncategorized" column, unless a real category by
/// that name already exists.
pub fn aggregate(tasks: &[Task]) -> Vec<TaskColumn> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Task>> = HashMap::new();
    let mut uncategorized: Vec<Task> = Vec::new();

    for task in tasks {
        match &task.category {
            Some(category) => {
                if !groups.contains_key(category) {
                    order.push(category.clone());
                }
                groups.entry(category.clone()).or_default().push(task.clone());
            }
            None => uncategorized.push(task.clone()),
        }
    }

    if !uncategorized.is_empty() {
        match groups.get_mut(FALLBACK_COLUMN_TITLE) {
            Some(existing) => existing.extend(uncategorized),
            None => {
                order.push(FALLBACK_COLUMN_TITLE.to_string());
                groups.insert(FALLBACK_COLUMN_TITLE.to_string(), uncategorized);
            }
        }
    }

    let mut used_ids: HashSet<String> = HashSet::new();
    order
        .into_iter()
        .map(|title| {
            let mut tasks = groups.remove(&title).unwrap_or_default();
            tasks.sort_by(compare_tasks);
            TaskColumn {
                id: unique_slug(&title, &mut used_ids),
                count: tasks.len(),
                title,
                tasks,
            }
        })
        .collect()
}

/// Newest first; dated before undated; then priority rank; then title.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    let by_date = match (a.created(), b.created()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| a.title.cmp(&b.title))
}

pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "column".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_slug(title: &str, used: &mut HashSet<String>) -> String {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}
