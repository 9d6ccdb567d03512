//! Subcommand execution against the task repository.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use time::OffsetDateTime;

use taskdeck_app::TaskRepository;
use taskdeck_core::id::TaskId;
use taskdeck_core::{
    SortKey, Status, Task, TaskDraft, TaskFilter, aggregate, completion_series, count_by_priority,
    count_by_status, export_tasks, filter_tasks, import_tasks, parse_date, sorted,
};
use taskdeck_store::KeyValueStore;

use crate::Command;

/// Listing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LsFormat {
    Table,
    Json,
}

impl std::str::FromStr for LsFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => bail!("unknown format {other:?}; expected table or json"),
        }
    }
}

/// Execute a parsed subcommand.
///
/// # Errors
/// Returns an error for invalid user input (bad dates, unknown labels or
/// ids, unreadable files); repository mutations themselves do not fail.
pub fn run<S: KeyValueStore>(command: Command, repository: &mut TaskRepository<S>) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            due,
            priority,
            tags,
        } => {
            let title = title.trim().to_owned();
            if title.is_empty() {
                bail!("title must not be empty");
            }
            let due_date = parse_date(&due)
                .with_context(|| format!("due date {due:?} must be formatted YYYY-MM-DD"))?;
            let task = repository.create(TaskDraft {
                title,
                description,
                due_date,
                priority: priority.parse()?,
                tags,
            });
            println!("created {} ({})", task.id, task.title);
        }

        Command::Edit {
            id,
            title,
            description,
            due,
            priority,
            status,
            tags,
        } => {
            let id = TaskId::from(id.as_str());
            let Some(current) = repository.get(&id).cloned() else {
                bail!("no task with id {id}");
            };
            let mut next = current;
            if let Some(title) = title {
                let title = title.trim().to_owned();
                if title.is_empty() {
                    bail!("title must not be empty");
                }
                next.title = title;
            }
            if let Some(description) = description {
                next.description = description;
            }
            if let Some(due) = due {
                next.due_date = parse_date(&due)
                    .with_context(|| format!("due date {due:?} must be formatted YYYY-MM-DD"))?;
            }
            if let Some(priority) = priority {
                next.priority = priority.parse()?;
            }
            if let Some(status) = status {
                next.status = status.parse()?;
            }
            if let Some(tags) = tags {
                next.tags = tags;
            }
            repository.update(next);
            println!("updated {id}");
        }

        Command::Done { id } => {
            let id = TaskId::from(id.as_str());
            let Some(current) = repository.get(&id).cloned() else {
                bail!("no task with id {id}");
            };
            let mut next = current;
            next.status = Status::Done;
            repository.update(next);
            println!("completed {id}");
        }

        Command::Rm { id } => {
            let id = TaskId::from(id.as_str());
            let known = repository.get(&id).is_some();
            repository.delete(&id);
            if known {
                println!("removed {id}");
            } else {
                println!("no task with id {id}; nothing removed");
            }
        }

        Command::Ls {
            search,
            status,
            priority,
            sort,
            format,
        } => {
            let filter = TaskFilter {
                text: search,
                status: status.as_deref().map(str::parse).transpose()?,
                priority: priority.as_deref().map(str::parse).transpose()?,
            };
            let sort: SortKey = sort.parse()?;
            let format: LsFormat = format.parse()?;

            let tasks = sorted(&filter_tasks(&repository.snapshot(), &filter), sort);
            match format {
                LsFormat::Table => print_table(&tasks),
                LsFormat::Json => println!("{}", export_tasks(&tasks)?),
            }
        }

        Command::Stats => {
            let tasks = repository.snapshot();
            let stats = aggregate(&tasks, OffsetDateTime::now_utc());
            println!("total:       {}", stats.total);
            println!("completed:   {}", stats.completed);
            println!("in progress: {}", stats.in_progress);
            println!("overdue:     {}", stats.overdue);

            println!("\nby status:");
            for (status, count) in count_by_status(&tasks) {
                println!("  {:<12} {count}", status.as_str());
            }
            println!("\nby priority:");
            for (priority, count) in count_by_priority(&tasks) {
                println!("  {:<12} {count}", priority.as_str());
            }
        }

        Command::Trend { days } => {
            let tasks = repository.snapshot();
            let today = OffsetDateTime::now_utc().date();
            for day in completion_series(&tasks, today, days) {
                println!("{}  {:>3}  {}", day.date, day.completed, "#".repeat(day.completed));
            }
        }

        Command::Import { file } => {
            let document = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let tasks = import_tasks(&document)?;
            let count = tasks.len();
            repository.replace_all(tasks)?;
            println!("imported {count} tasks from {}", file.display());
        }

        Command::Export { output } => {
            let payload = export_tasks(&repository.snapshot())?;
            let path = output.unwrap_or_else(|| PathBuf::from("tasks.json"));
            fs::write(&path, payload)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("exported {} tasks to {}", repository.len(), path.display());
        }
    }
    Ok(())
}

fn print_table(tasks: &[Task]) {
    println!(
        "{:<40} {:<12} {:<8} {:<12} {}",
        "ID", "STATUS", "PRI", "DUE", "TITLE [tags]"
    );
    for task in tasks {
        let tags = if task.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", task.tags.join(","))
        };
        println!(
            "{:<40} {:<12} {:<8} {:<12} {}{}",
            task.id,
            task.status.as_str(),
            task.priority.as_str(),
            task.due_date.to_string(),
            task.title,
            tags
        );
    }
}
