use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use crate::cli::commands::{
    GoalAction, ListAction, NoteAction, PlanAction, TagAction, TargetAction, TaskAction,
};
use crate::config::AppConfig;
use crate::entity::{
    GoalStatus, ListPatch, NewList, NewNinetyDayTarget, NewPlan, NewTag, NewTask,
    NewThreeYearGoal, NinetyDayTargetPatch, Persistable, PlanPatch, TaskPatch,
    ThreeYearGoalPatch, INBOX_LIST_ID,
};
use crate::error::{HorizonsError, Result};
use crate::repo::{ApiResponse, Workspace};
use crate::store::{LocalCache, SignedOutRemote, SyncEngine};

/// Build the workspace for this invocation. The CLI runs without an
/// authenticated session, so the engine is wired to the signed-out
/// remote and every operation works against the local cache.
fn open_workspace() -> Result<Workspace> {
    let config = AppConfig::load()?;
    let data_dir = config.data_dir()?;
    fs::create_dir_all(&data_dir)?;
    let cache = LocalCache::open(&data_dir)?;
    let engine = Arc::new(SyncEngine::new(cache, Arc::new(SignedOutRemote)));
    Ok(Workspace::new(engine))
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

/// Resolve a full id or unique id prefix against a collection.
fn resolve_id<T: Persistable>(items: &[T], needle: &str) -> Result<String> {
    if items.iter().any(|item| item.id() == needle) {
        return Ok(needle.to_string());
    }
    let mut matches = items.iter().filter(|item| item.id().starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id().to_string()),
        (Some(_), Some(_)) => Err(HorizonsError::AmbiguousId(needle.to_string())),
        (None, _) => Err(HorizonsError::EntityNotFound(needle.to_string())),
    }
}

/// Confirm a deletion unless --force was given. Non-interactive runs
/// must pass --force.
fn confirm_delete(label: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    eprintln!("Delete {}? [y/N] ", label);
    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(false);
        }
        Ok(true)
    } else {
        Err(HorizonsError::Storage(
            "Use --force to delete in non-interactive mode".to_string(),
        ))
    }
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn print_json<T: serde::Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(data))?);
    Ok(())
}

pub fn handle_task(action: TaskAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        TaskAction::Add {
            title,
            list,
            due,
            tags,
            stdin,
            json,
        } => {
            let list_id = match list {
                Some(ref l) if l != INBOX_LIST_ID => Some(resolve_id(&ws.lists.list(), l)?),
                other => other,
            };
            let mut draft = NewTask {
                title,
                list_id,
                due_date: due
                    .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
                tag_ids: tags,
                ..Default::default()
            };
            if stdin {
                let content = read_stdin()?;
                if !content.is_empty() {
                    draft.notes = Some(content);
                }
            }
            let task = ws.tasks.create(draft);
            if json {
                print_json(task)?;
            } else {
                println!("Created task ({}) - {}", short_id(&task.id), task.title);
            }
        }
        TaskAction::List { all, json } => {
            let mut tasks = ws.tasks.list();
            if !all {
                tasks.retain(|t| !t.completed);
            }
            if json {
                print_json(tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                for task in &tasks {
                    let marker = if task.completed { "x" } else { " " };
                    let due = task
                        .due_date
                        .map(|d| format!("  (due {})", d))
                        .unwrap_or_default();
                    println!("[{}] ({}) {}{}", marker, short_id(&task.id), task.title, due);
                }
            }
        }
        TaskAction::Done { id, json } => {
            let resolved = resolve_id(&ws.tasks.list(), &id)?;
            let task = ws.tasks.toggle_completion(&resolved)?;
            if json {
                print_json(task)?;
            } else if task.completed {
                println!("Completed task ({}) - {}", short_id(&task.id), task.title);
            } else {
                println!("Reopened task ({}) - {}", short_id(&task.id), task.title);
            }
        }
        TaskAction::Update {
            id,
            title,
            list,
            due,
            clear_due,
            json,
        } => {
            let resolved = resolve_id(&ws.tasks.list(), &id)?;
            let list_id = match list {
                Some(ref l) if l != INBOX_LIST_ID => Some(resolve_id(&ws.lists.list(), l)?),
                other => other,
            };
            let mut patch = TaskPatch {
                title,
                list_id,
                ..Default::default()
            };
            if clear_due {
                patch.due_date = Some(None);
            } else if let Some(d) = due {
                patch.due_date = chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .ok()
                    .map(|date| Some(date));
            }
            let task = ws.tasks.update(&resolved, patch)?;
            if json {
                print_json(task)?;
            } else {
                println!("Updated task ({}) - {}", short_id(&task.id), task.title);
            }
        }
        TaskAction::Rm { id, force } => {
            let tasks = ws.tasks.list();
            let resolved = resolve_id(&tasks, &id)?;
            let task = tasks.iter().find(|t| t.id == resolved).cloned();
            let label = task
                .map(|t| format!("task ({}) - {}", short_id(&t.id), t.title))
                .unwrap_or_else(|| format!("task {}", id));
            if confirm_delete(&label, force)? {
                ws.tasks.delete(&resolved)?;
                println!("Deleted {}", label);
            }
        }
    }
    Ok(())
}

pub fn handle_list(action: ListAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        ListAction::Add { name, color, json } => {
            let list = ws.lists.create(NewList { name, color });
            if json {
                print_json(list)?;
            } else {
                println!("Created list ({}) - {}", short_id(&list.id), list.name);
            }
        }
        ListAction::List { json } => {
            let lists = ws.lists.list();
            if json {
                print_json(lists)?;
            } else if lists.is_empty() {
                println!("No lists found.");
            } else {
                for list in &lists {
                    println!("({}) {}", short_id(&list.id), list.name);
                }
            }
        }
        ListAction::Update {
            id,
            name,
            color,
            json,
        } => {
            let resolved = resolve_id(&ws.lists.list(), &id)?;
            let patch = ListPatch {
                name,
                color: color.map(Some),
            };
            let list = ws.lists.update(&resolved, patch)?;
            if json {
                print_json(list)?;
            } else {
                println!("Updated list ({}) - {}", short_id(&list.id), list.name);
            }
        }
        ListAction::Rm { id, force } => {
            let lists = ws.lists.list();
            let resolved = resolve_id(&lists, &id)?;
            let label = lists
                .iter()
                .find(|l| l.id == resolved)
                .map(|l| format!("list ({}) - {}", short_id(&l.id), l.name))
                .unwrap_or_else(|| format!("list {}", id));
            if confirm_delete(&label, force)? {
                ws.lists.delete(&resolved)?;
                println!("Deleted {} (its tasks moved to the inbox)", label);
            }
        }
    }
    Ok(())
}

pub fn handle_goal(action: GoalAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        GoalAction::Add {
            title,
            description,
            json,
        } => {
            let goal = ws.goals.create(NewThreeYearGoal { title, description });
            if json {
                print_json(goal)?;
            } else {
                println!("Created goal ({}) - {}", short_id(&goal.id), goal.title);
            }
        }
        GoalAction::List { json } => {
            let goals = ws.goals.list();
            if json {
                print_json(goals)?;
            } else if goals.is_empty() {
                println!("No goals found.");
            } else {
                for goal in &goals {
                    println!("({}) [{}] {}", short_id(&goal.id), goal.status, goal.title);
                }
            }
        }
        GoalAction::Update {
            id,
            title,
            status,
            json,
        } => {
            let resolved = resolve_id(&ws.goals.list(), &id)?;
            let patch = ThreeYearGoalPatch {
                title,
                status: status.and_then(|s| s.parse::<GoalStatus>().ok()),
                ..Default::default()
            };
            let goal = ws.goals.update(&resolved, patch)?;
            if json {
                print_json(goal)?;
            } else {
                println!("Updated goal ({}) - {}", short_id(&goal.id), goal.title);
            }
        }
        GoalAction::Rm { id, force } => {
            let goals = ws.goals.list();
            let resolved = resolve_id(&goals, &id)?;
            let label = goals
                .iter()
                .find(|g| g.id == resolved)
                .map(|g| format!("goal ({}) - {}", short_id(&g.id), g.title))
                .unwrap_or_else(|| format!("goal {}", id));
            if confirm_delete(&label, force)? {
                ws.goals.delete(&resolved)?;
                println!("Deleted {} and everything under it", label);
            }
        }
    }
    Ok(())
}

pub fn handle_target(action: TargetAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        TargetAction::Add { title, goal, json } => {
            let goal_id = resolve_id(&ws.goals.list(), &goal)?;
            let target = ws.targets.create(NewNinetyDayTarget {
                title,
                three_year_goal_id: goal_id,
            });
            if json {
                print_json(target)?;
            } else {
                println!("Created target ({}) - {}", short_id(&target.id), target.title);
            }
        }
        TargetAction::List { json } => {
            let targets = ws.targets.list();
            if json {
                print_json(targets)?;
            } else if targets.is_empty() {
                println!("No targets found.");
            } else {
                for target in &targets {
                    println!(
                        "({}) [{}] {}",
                        short_id(&target.id),
                        target.status,
                        target.title
                    );
                }
            }
        }
        TargetAction::Update {
            id,
            title,
            status,
            json,
        } => {
            let resolved = resolve_id(&ws.targets.list(), &id)?;
            let patch = NinetyDayTargetPatch {
                title,
                status: status.and_then(|s| s.parse::<GoalStatus>().ok()),
                ..Default::default()
            };
            let target = ws.targets.update(&resolved, patch)?;
            if json {
                print_json(target)?;
            } else {
                println!("Updated target ({}) - {}", short_id(&target.id), target.title);
            }
        }
        TargetAction::Rm { id, force } => {
            let targets = ws.targets.list();
            let resolved = resolve_id(&targets, &id)?;
            let label = targets
                .iter()
                .find(|t| t.id == resolved)
                .map(|t| format!("target ({}) - {}", short_id(&t.id), t.title))
                .unwrap_or_else(|| format!("target {}", id));
            if confirm_delete(&label, force)? {
                ws.targets.delete(&resolved)?;
                println!("Deleted {} and its plans", label);
            }
        }
    }
    Ok(())
}

pub fn handle_plan(action: PlanAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        PlanAction::Add {
            title,
            target,
            json,
        } => {
            let target_id = resolve_id(&ws.targets.list(), &target)?;
            let plan = ws.plans.create(NewPlan {
                title,
                ninety_day_target_id: target_id,
            });
            if json {
                print_json(plan)?;
            } else {
                println!("Created plan ({}) - {}", short_id(&plan.id), plan.title);
            }
        }
        PlanAction::List { json } => {
            let plans = ws.plans.list();
            if json {
                print_json(plans)?;
            } else if plans.is_empty() {
                println!("No plans found.");
            } else {
                for plan in &plans {
                    println!("({}) [{}] {}", short_id(&plan.id), plan.status, plan.title);
                }
            }
        }
        PlanAction::Update {
            id,
            title,
            status,
            json,
        } => {
            let resolved = resolve_id(&ws.plans.list(), &id)?;
            let patch = PlanPatch {
                title,
                status: status.and_then(|s| s.parse::<GoalStatus>().ok()),
                ..Default::default()
            };
            let plan = ws.plans.update(&resolved, patch)?;
            if json {
                print_json(plan)?;
            } else {
                println!("Updated plan ({}) - {}", short_id(&plan.id), plan.title);
            }
        }
        PlanAction::Rm { id, force } => {
            let plans = ws.plans.list();
            let resolved = resolve_id(&plans, &id)?;
            let label = plans
                .iter()
                .find(|p| p.id == resolved)
                .map(|p| format!("plan ({}) - {}", short_id(&p.id), p.title))
                .unwrap_or_else(|| format!("plan {}", id));
            if confirm_delete(&label, force)? {
                ws.plans.delete(&resolved)?;
                println!("Deleted {}", label);
            }
        }
    }
    Ok(())
}

pub fn handle_tag(action: TagAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        TagAction::Add { name, color, json } => {
            let tag = ws.tags.create(NewTag { name, color });
            if json {
                print_json(tag)?;
            } else {
                println!("Created tag ({}) - {}", short_id(&tag.id), tag.name);
            }
        }
        TagAction::List { json } => {
            let tags = ws.tags.list();
            if json {
                print_json(tags)?;
            } else if tags.is_empty() {
                println!("No tags found.");
            } else {
                for tag in &tags {
                    println!("({}) {}", short_id(&tag.id), tag.name);
                }
            }
        }
        TagAction::Rm { id, force } => {
            let tags = ws.tags.list();
            let resolved = resolve_id(&tags, &id)?;
            let label = tags
                .iter()
                .find(|t| t.id == resolved)
                .map(|t| format!("tag ({}) - {}", short_id(&t.id), t.name))
                .unwrap_or_else(|| format!("tag {}", id));
            if confirm_delete(&label, force)? {
                ws.tags.delete(&resolved)?;
                println!("Deleted {}", label);
            }
        }
    }
    Ok(())
}

pub fn handle_note(action: NoteAction) -> Result<()> {
    let ws = open_workspace()?;
    match action {
        NoteAction::Show { json } => {
            let content = ws.notepad.get();
            if json {
                print_json(content)?;
            } else if content.is_empty() {
                println!("Notepad is empty.");
            } else {
                println!("{}", content);
            }
        }
        NoteAction::Set { text, stdin, json } => {
            let content = match text {
                Some(text) if !stdin => text,
                _ => {
                    if !stdin && atty::is(atty::Stream::Stdin) {
                        return Err(HorizonsError::Storage(
                            "Provide text or pass --stdin".to_string(),
                        ));
                    }
                    read_stdin()?
                }
            };
            ws.notepad.set(&content);
            if json {
                print_json(ws.notepad.get())?;
            } else {
                println!("Notepad updated.");
            }
        }
    }
    Ok(())
}
