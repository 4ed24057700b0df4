use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use taskdesk::error::ApiError;
use taskdesk::model::{
    CreateTaskParams, FileUpload, PagedResult, Task, TaskPriority, TaskQuery, TaskStatus,
    UpdateTaskParams,
};
use taskdesk::usecase::{
    CreateTask, CreateTaskRequest, Credentials, DeleteTask, GetTask, GetTasks, GetUsers, Login,
    Logout, StatusChange, UpdateTask, UpdateTaskRequest, UpdateTaskStatus, UseCase,
};
use taskdesk::{ApiClient, Navigator};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Login {
        email: String,
        password: String,
        remember: bool,
    },
    Logout,
    Tasks(TaskQuery),
    Show(i64),
    Add {
        params: CreateTaskParams,
        files: Vec<PathBuf>,
    },
    Edit {
        id: i64,
        params: UpdateTaskParams,
        files: Vec<PathBuf>,
        replace_attachments: bool,
    },
    Status {
        id: i64,
        status: TaskStatus,
    },
    Remove(i64),
    Users,
    Help,
}

/// Tells the terminal user their session is gone.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn show_login(&self) {
        eprintln!("Session expired. Run `taskdesk login <email> <password>` to sign in again.");
    }
}

/// Fields shared by `add` and `edit`.
#[derive(Debug, Default)]
struct TaskFlags {
    words: Vec<String>,
    description: Option<String>,
    work_date: Option<String>,
    work_time: Option<String>,
    due_date: Option<String>,
    priority: Option<TaskPriority>,
    assignees: Vec<i64>,
    files: Vec<PathBuf>,
    replace_attachments: bool,
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value),
        None => bail!("Missing value for {flag} flag"),
    }
}

fn parse_id(value: &str) -> Result<i64> {
    value
        .trim_start_matches('#')
        .parse()
        .with_context(|| format!("Invalid task id: {value}"))
}

pub fn parse_status(value: &str) -> Result<TaskStatus> {
    TaskStatus::ALL
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| anyhow!("Unknown status '{value}' (expected pending, running, completed or cancelled)"))
}

pub fn parse_priority(value: &str) -> Result<TaskPriority> {
    TaskPriority::ALL
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| anyhow!("Unknown priority '{value}' (expected low, normal or high)"))
}

fn parse_task_flags(args: &[String]) -> Result<TaskFlags> {
    let mut flags = TaskFlags::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--desc" | "--description" => {
                flags.description = Some(flag_value(args, &mut i, "-d/--desc")?.to_string());
            }
            "--date" => flags.work_date = Some(flag_value(args, &mut i, "--date")?.to_string()),
            "--time" => flags.work_time = Some(flag_value(args, &mut i, "--time")?.to_string()),
            "--due" => flags.due_date = Some(flag_value(args, &mut i, "--due")?.to_string()),
            "-p" | "--priority" => {
                flags.priority = Some(parse_priority(flag_value(args, &mut i, "--priority")?)?);
            }
            "-a" | "--assign" => {
                let value = flag_value(args, &mut i, "--assign")?;
                let id = value
                    .parse()
                    .with_context(|| format!("Invalid user id: {value}"))?;
                flags.assignees.push(id);
            }
            "-f" | "--file" => flags.files.push(PathBuf::from(flag_value(args, &mut i, "--file")?)),
            "--replace-attachments" => flags.replace_attachments = true,
            _ => flags.words.push(args[i].clone()),
        }
        i += 1;
    }

    Ok(flags)
}

fn parse_tasks_args(args: &[String]) -> Result<TaskQuery> {
    let mut query = TaskQuery::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => query.from_date = Some(flag_value(args, &mut i, "--from")?.to_string()),
            "--to" => query.to_date = Some(flag_value(args, &mut i, "--to")?.to_string()),
            "--page" => {
                let value = flag_value(args, &mut i, "--page")?;
                query.page = Some(value.parse().with_context(|| format!("Invalid page: {value}"))?);
            }
            other => bail!("Unexpected argument for tasks: {other}"),
        }
        i += 1;
    }
    Ok(query)
}

/// Parse the full argument list (without the program name).
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "login" => {
            let remember = rest.iter().any(|a| a == "--remember");
            let positional: Vec<&String> = rest.iter().filter(|a| *a != "--remember").collect();
            match positional.as_slice() {
                [email, password] => Ok(Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                    remember,
                }),
                _ => bail!("Usage: taskdesk login <email> <password> [--remember]"),
            }
        }
        "logout" => Ok(Command::Logout),
        "tasks" | "ls" => Ok(Command::Tasks(parse_tasks_args(rest)?)),
        "show" => match rest {
            [id] => Ok(Command::Show(parse_id(id)?)),
            _ => bail!("Usage: taskdesk show <id>"),
        },
        "add" => {
            let flags = parse_task_flags(rest)?;
            let title = flags.words.join(" ");
            if title.trim().is_empty() {
                bail!("Task title cannot be empty");
            }
            Ok(Command::Add {
                params: CreateTaskParams {
                    title,
                    description: flags.description,
                    work_date: flags.work_date,
                    work_time: flags.work_time,
                    priority: flags.priority,
                    due_date: flags.due_date,
                    assignee_ids: flags.assignees,
                },
                files: flags.files,
            })
        }
        "edit" => {
            let Some((id, rest)) = rest.split_first() else {
                bail!("Usage: taskdesk edit <id> [title] [flags]");
            };
            let id = parse_id(id)?;
            let flags = parse_task_flags(rest)?;
            let title = flags.words.join(" ");
            Ok(Command::Edit {
                id,
                params: UpdateTaskParams {
                    title: (!title.trim().is_empty()).then_some(title),
                    description: flags.description,
                    work_date: flags.work_date,
                    work_time: flags.work_time,
                    priority: flags.priority,
                    due_date: flags.due_date,
                    assignee_ids: (!flags.assignees.is_empty()).then_some(flags.assignees),
                },
                replace_attachments: flags.replace_attachments || !flags.files.is_empty(),
                files: flags.files,
            })
        }
        "status" => match rest {
            [id, status] => Ok(Command::Status {
                id: parse_id(id)?,
                status: parse_status(status)?,
            }),
            _ => bail!("Usage: taskdesk status <id> <pending|running|completed|cancelled>"),
        },
        "rm" | "delete" => match rest {
            [id] => Ok(Command::Remove(parse_id(id)?)),
            _ => bail!("Usage: taskdesk rm <id>"),
        },
        "users" => Ok(Command::Users),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("Unknown command '{other}'. Run `taskdesk help` for usage."),
    }
}

fn report(err: ApiError) -> anyhow::Error {
    match err.code() {
        0 => anyhow!("{}", err.message()),
        code => anyhow!("{} (HTTP {code})", err.message()),
    }
}

async fn load_files(paths: &[PathBuf]) -> Result<Vec<FileUpload>> {
    futures::future::try_join_all(paths.iter().map(|path| async move {
        FileUpload::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }))
    .await
}

pub fn format_task(task: &Task) -> String {
    let id = task
        .id
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "#?".to_string());
    let mut line = format!(
        "{id:<6} [{:<9}] [{:<6}] {}",
        task.status,
        task.priority,
        task.title.as_deref().unwrap_or("(untitled)")
    );
    let when: Vec<&str> = [task.work_date.as_deref(), task.work_time.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !when.is_empty() {
        line.push_str(&format!("  @ {}", when.join(" ")));
    }
    if let Some(due) = &task.due_date {
        line.push_str(&format!("  due {due}"));
    }
    line
}

fn print_task_detail(task: &Task) {
    println!("{}", format_task(task));
    if let Some(description) = &task.description {
        println!("  {description}");
    }
    if let Some(creator) = &task.creator {
        println!("  created by {}", creator.display_name());
    }
    if !task.assignees.is_empty() {
        let names: Vec<String> = task.assignees.iter().map(|u| u.display_name()).collect();
        println!("  assigned to {}", names.join(", "));
    }
    for attachment in &task.attachments {
        println!(
            "  attachment: {} ({} bytes)",
            attachment.file_name.as_deref().unwrap_or("unnamed"),
            attachment.file_size
        );
    }
}

fn print_page(page: &PagedResult<Task>) {
    if page.items.is_empty() {
        println!("No tasks.");
    }
    for task in &page.items {
        println!("{}", format_task(task));
    }
    if let Some(next) = page.next_page() {
        println!("\nMore tasks available: taskdesk tasks --page {next}");
    }
}

/// Execute a parsed command against the service.
pub async fn run(command: Command, client: Arc<ApiClient>) -> Result<()> {
    match command {
        Command::Help => print_help(),
        Command::Login {
            email,
            password,
            remember,
        } => {
            let user = Login::new(client)
                .execute(Credentials {
                    email,
                    password,
                    remember_me: remember,
                })
                .await
                .map_err(report)?;
            println!("Logged in as {}", user.display_name());
        }
        Command::Logout => {
            Logout::new(client).execute(()).await.map_err(report)?;
            println!("Logged out.");
        }
        Command::Tasks(query) => {
            let page = GetTasks::new(client).execute(query).await.map_err(report)?;
            print_page(&page);
        }
        Command::Show(id) => {
            let task = GetTask::new(client).execute(id).await.map_err(report)?;
            print_task_detail(&task);
        }
        Command::Add { params, files } => {
            let files = load_files(&files).await?;
            let task = CreateTask::new(client)
                .execute(CreateTaskRequest { params, files })
                .await
                .map_err(report)?;
            println!("Created {}", format_task(&task));
        }
        Command::Edit {
            id,
            params,
            files,
            replace_attachments,
        } => {
            let files = load_files(&files).await?;
            let task = UpdateTask::new(client)
                .execute(UpdateTaskRequest {
                    id,
                    params,
                    files,
                    attachments_update: replace_attachments,
                })
                .await
                .map_err(report)?;
            println!("Updated {}", format_task(&task));
        }
        Command::Status { id, status } => {
            let task = UpdateTaskStatus::new(client)
                .execute(StatusChange { id, status })
                .await
                .map_err(report)?;
            println!("{}", format_task(&task));
        }
        Command::Remove(id) => {
            DeleteTask::new(client).execute(id).await.map_err(report)?;
            println!("Deleted #{id}");
        }
        Command::Users => {
            let users = GetUsers::new(client).execute(()).await.map_err(report)?;
            for user in users {
                let id = user.id.map(|id| id.to_string()).unwrap_or_default();
                let role = user.role.as_deref().unwrap_or("-");
                println!("{id:<6} {:<24} {role}", user.display_name());
            }
        }
    }
    Ok(())
}

pub fn print_help() {
    println!("taskdesk: command-line client for the task service\n");
    println!("USAGE:");
    println!("  taskdesk login <email> <password> [--remember]");
    println!("  taskdesk logout");
    println!("  taskdesk tasks [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--page N]");
    println!("  taskdesk show <id>");
    println!("  taskdesk add <title> [task options]");
    println!("  taskdesk edit <id> [new title] [task options] [--replace-attachments]");
    println!("  taskdesk status <id> <pending|running|completed|cancelled>");
    println!("  taskdesk rm <id>");
    println!("  taskdesk users");
    println!();
    println!("TASK OPTIONS:");
    println!("  -d, --desc <text>       Description");
    println!("      --date <date>       Work date");
    println!("      --time <time>       Work time");
    println!("      --due <date>        Due date");
    println!("  -p, --priority <level>  low, normal or high");
    println!("  -a, --assign <user id>  Assign a user (repeatable)");
    println!("  -f, --file <path>       Attach a file (repeatable)");
    println!();
    println!("Configuration is read from ~/.taskdesk/config.toml; TASKDESK_BASE_URL overrides the API URL.");
}
