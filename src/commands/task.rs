use anyhow::{Result, bail};
use daydeck_core::deck::Deck;
use daydeck_core::state::Dashboard;
use daydeck_core::task::{Task, TaskKind};
use owo_colors::OwoColorize;

use crate::render;

pub async fn add(deck: &Deck, text: String, list: &str) -> Result<()> {
    let kind: TaskKind = list.parse()?;
    let store = deck.store()?;
    let remote = super::remote_for(deck)?;

    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());
    let task = dashboard.add_task(text, kind);

    super::persist_and_publish(&dashboard, &store, &remote).await?;

    println!("   {}", render::format_task_line(&task));
    println!("{}", format!("Added to {}.", kind.title()).green());

    Ok(())
}

pub async fn done(deck: &Deck, id: &str) -> Result<()> {
    let store = deck.store()?;
    let remote = super::remote_for(deck)?;

    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());
    let task = resolve_task(dashboard.tasks(), id)?.clone();

    dashboard.toggle_task(&task.id);
    super::persist_and_publish(&dashboard, &store, &remote).await?;

    // A completed task toggles back to open.
    if task.completed {
        println!("{} {}", "Reopened:".yellow(), task.text);
    } else {
        println!("{} {}", "Done:".green(), task.text);
    }

    Ok(())
}

pub async fn rm(deck: &Deck, id: &str) -> Result<()> {
    let store = deck.store()?;
    let remote = super::remote_for(deck)?;

    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());
    let task = resolve_task(dashboard.tasks(), id)?.clone();

    dashboard.delete_task(&task.id);
    super::persist_and_publish(&dashboard, &store, &remote).await?;

    println!("{} {}", "Removed:".green(), task.text);

    Ok(())
}

pub fn list(deck: &Deck, list: Option<&str>) -> Result<()> {
    let store = deck.store()?;
    let dashboard = Dashboard::load(&store, deck.config().user_email.clone());

    let kinds: Vec<TaskKind> = match list {
        Some(raw) => vec![raw.parse()?],
        None => TaskKind::ALL.to_vec(),
    };

    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            println!();
        }

        println!("{}", kind.title().bold());

        let tasks: Vec<&Task> = dashboard.tasks_of(*kind).collect();
        if tasks.is_empty() {
            println!("   {}", "No active assignments".dimmed());
            continue;
        }

        for task in tasks {
            println!("   {}", render::format_task_line(task));
        }
    }

    Ok(())
}

/// Match an id the way users type it: exact first, then unique prefix.
fn resolve_task<'a>(tasks: &'a [Task], needle: &str) -> Result<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.id == needle) {
        return Ok(task);
    }

    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(needle)).collect();

    match matches.len() {
        0 => bail!("No task with id '{needle}'. Try `daydeck task list`."),
        1 => Ok(matches[0]),
        n => bail!("Task id '{needle}' is ambiguous ({n} matches). Use more characters."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_id(id: &str) -> Task {
        Task {
            id: id.into(),
            text: format!("task {id}"),
            completed: false,
            kind: TaskKind::Today,
            created_at: 0,
        }
    }

    // --- id resolution ---

    #[test]
    fn unique_prefixes_resolve() {
        let tasks = vec![task_with_id("a1b2c3"), task_with_id("f9e8d7")];

        assert_eq!(resolve_task(&tasks, "a1").unwrap().id, "a1b2c3");
        assert_eq!(resolve_task(&tasks, "f9e8d7").unwrap().id, "f9e8d7");
    }

    #[test]
    fn ambiguous_prefixes_are_rejected() {
        let tasks = vec![task_with_id("a1b2c3"), task_with_id("a1zzzz")];

        let err = resolve_task(&tasks, "a1").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn exact_match_beats_prefix_ambiguity() {
        // "a1" names a real task even though it also prefixes another.
        let tasks = vec![task_with_id("a1"), task_with_id("a1b2c3")];

        assert_eq!(resolve_task(&tasks, "a1").unwrap().id, "a1");
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let tasks = vec![task_with_id("a1b2c3")];

        let err = resolve_task(&tasks, "zz").unwrap_err();
        assert!(err.to_string().contains("No task"));
    }
}
