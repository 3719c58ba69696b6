use mailsync::api::{self, HttpMailApi};
use mailsync::config::MailSyncConfig;
use mailsync::core::column::TaskColumn;
use mailsync::core::insight::Insights;
use mailsync::core::stats::TaskStats;
use mailsync::store::{StorePolicies, TaskSnapshot, TaskStore};

const USAGE: &str = "\
Usage: mailsync [--debug] <command>

Commands:
  board              Show tasks grouped by category (default)
  search <query...>  Search mail server-side, e.g. `search priority:High`
  refresh            Pull new mail, then show the board
  insights           Show dashboard metrics
  stats              Summarize the current task list
  login <token>      Store the MailSync auth token in the keyring
  logout             Remove the stored token";

enum Command {
    Board,
    Search(String),
    Refresh,
    Insights,
    Stats,
    Login(String),
    Logout,
    Help,
}

fn parse_args(args: &[String]) -> (bool, Result<Command, String>) {
    let debug = args.iter().any(|a| a == "--debug");
    let rest: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--debug")
        .collect();

    let command = match rest.as_slice() {
        [] | ["board"] => Ok(Command::Board),
        ["search", query @ ..] => Ok(Command::Search(query.join(" "))),
        ["refresh"] => Ok(Command::Refresh),
        ["insights"] => Ok(Command::Insights),
        ["stats"] => Ok(Command::Stats),
        ["login", token] => Ok(Command::Login(token.to_string())),
        ["logout"] => Ok(Command::Logout),
        ["help" | "--help" | "-h"] => Ok(Command::Help),
        other => Err(format!("Unknown command: {}", other.join(" "))),
    };
    (debug, command)
}

/// Log to the systemd user journal (`journalctl --user -t mailsync -f`).
/// mailsync targets at info/debug, everything else at warn.
fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("mailsync") {
                let max = if mailsync::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("mailsync".to_string()),
        Err(e) => {
            eprintln!("mailsync: journal unavailable, logging disabled ({})", e);
            return;
        }
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MailSyncConfig::load();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (debug_flag, command) = parse_args(&args);
    mailsync::set_debug_logging(config.debug_logging || debug_flag);
    init_logging();

    let command = match command {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Login(token) => {
            api::keyring::store_token(&config.base_url, &token).await?;
            println!("Token stored for {}", config.base_url);
            return Ok(());
        }
        Command::Logout => {
            api::keyring::delete_token(&config.base_url).await?;
            println!("Signed out of {}", config.base_url);
            return Ok(());
        }
        _ => {}
    }

    let token = api::keyring::resolve_token(&config.base_url).await;
    let client = HttpMailApi::new(&config.base_url, token, config.request_timeout())?;
    let store = TaskStore::new(client, StorePolicies::from_config(&config));

    match command {
        Command::Board => {
            let snapshot = store.ensure_loaded().await;
            print_board(&snapshot, &store.columns());
        }
        Command::Search(query) => {
            if let Err(e) = store.search(&query).await {
                log::warn!("Search failed: {}", e);
            }
            print_board(&store.snapshot(), &store.columns());
        }
        Command::Refresh => {
            store.update_and_fetch().await?;
            print_board(&store.snapshot(), &store.columns());
        }
        Command::Insights => {
            let insights = store.insights().await?;
            print_insights(&insights);
        }
        Command::Stats => {
            let snapshot = store.ensure_loaded().await;
            print_error_banner(&snapshot);
            print_stats(&store.stats(chrono::Utc::now()));
        }
        Command::Help | Command::Login(_) | Command::Logout => {}
    }

    Ok(())
}

fn or_none(label: &str) -> &str {
    if label.is_empty() { "(none)" } else { label }
}

fn print_error_banner(snapshot: &TaskSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("!! {} (run `mailsync board` to retry)\n", error);
    }
}

fn print_board(snapshot: &TaskSnapshot, columns: &[TaskColumn]) {
    print_error_banner(snapshot);
    if let Some(query) = &snapshot.query {
        println!("Search: {}\n", query);
    }
    if columns.is_empty() {
        println!("No tasks.");
        return;
    }
    for column in columns {
        println!("== {} ({}) ==", column.title, column.count);
        for task in &column.tasks {
            let mut line = format!("  [{}] {}", or_none(task.priority.label()), task.title);
            if let Some(due) = &task.due_date {
                line.push_str(&format!(" (due {})", due));
            }
            if let Some(sender) = task.sender_name.as_ref().or(task.sender_email.as_ref()) {
                line.push_str(&format!(" from {}", sender));
            }
            if task.important {
                line.push_str(" *");
            }
            println!("{}", line);
        }
        println!();
    }
}

fn print_insights(insights: &Insights) {
    println!("Emails:          {}", insights.total_email);
    println!("Tasks completed: {}", insights.tasks_completed);
    println!("Meetings:        {}", insights.meeting_count);
    if let Some(ratio) = insights.completion_ratio() {
        println!("Completion:      {:.0}%", ratio * 100.0);
    }
    if !insights.categories.is_empty() {
        println!("\nBy category:");
        for entry in &insights.categories {
            println!("  {:<20} {}", entry.label, entry.count);
        }
    }
    if !insights.sentiments.is_empty() {
        println!("\nBy sentiment:");
        for entry in &insights.sentiments {
            println!("  {:<20} {}", entry.label, entry.count);
        }
    }
}

fn print_stats(stats: &TaskStats) {
    println!(
        "{} tasks, {} important, {} completed, {} overdue",
        stats.total, stats.important, stats.completed, stats.overdue
    );
    println!("\nBy priority:");
    for (label, count) in &stats.by_priority {
        println!("  {:<20} {}", or_none(label), count);
    }
    println!("\nBy sentiment:");
    for (label, count) in &stats.by_sentiment {
        println!("  {:<20} {}", label, count);
    }
    println!("\nBy category:");
    for (label, count) in &stats.by_category {
        println!("  {:<20} {}", label, count);
    }
}
