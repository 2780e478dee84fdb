//! Terminal front end for the todo lists service.
//!
//! Each invocation mounts the relevant view, performs at most one action,
//! and prints the view afterwards. Lists and items may be named by UUID or by
//! the 1-based position printed next to them.

mod transport;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use todo_core::{Dashboard, Detail, Session, TodoClient, Transport};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use transport::UreqTransport;

#[derive(Parser)]
#[command(name = "todo", about = "Manage your todo lists from the terminal")]
struct Cli {
    /// Root URL of the todo server.
    #[arg(long, env = "TODO_BASE_URL", default_value = "http://localhost:5000")]
    base_url: String,

    /// Bearer token identifying you to the server.
    #[arg(long, env = "TODO_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all your lists, newest first.
    Lists,
    /// Create a new, empty list.
    Create { name: String },
    /// Delete a list and everything in it.
    Delete { list: String },
    /// Show one list and its items.
    Show { list: String },
    /// Append an item to a list.
    Add { list: String, text: String },
    /// Flip an item between done and not done.
    Toggle { list: String, item: String },
    /// Remove an item from a list.
    Remove { list: String, item: String },
    /// Rename a list.
    Rename { list: String, name: String },
}

/// A list or item named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Id(Uuid),
    Position(usize),
}

impl Reference {
    fn parse(raw: &str) -> Result<Self> {
        if let Ok(id) = raw.parse() {
            return Ok(Reference::Id(id));
        }
        match raw.parse::<usize>() {
            Ok(position) if position > 0 => Ok(Reference::Position(position)),
            _ => bail!("{raw:?} is neither an id nor a position (1, 2, ...)"),
        }
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = TodoClient::new(&cli.base_url).with_token(cli.token);
    let mut session = Session::new(client, UreqTransport::new());

    let output = run(&mut session, cli.command)?;
    print!("{output}");
    Ok(())
}

fn run<T: Transport>(session: &mut Session<T>, command: Command) -> Result<String> {
    match command {
        Command::Lists => {
            let mut view = Dashboard::new();
            view.mount(session);
            finish(view.render(), view.error())
        }
        Command::Create { name } => {
            if name.trim().is_empty() {
                bail!("list name cannot be empty");
            }
            let mut view = Dashboard::new();
            view.mount(session);
            view.open_dialog();
            view.set_new_name(name);
            view.create(session);
            finish(view.render(), view.error())
        }
        Command::Delete { list } => {
            let mut view = dashboard(session)?;
            let id = resolve_list(&view, &list)?;
            view.delete(session, id);
            finish(view.render(), view.error())
        }
        Command::Show { list } => {
            let mut view = detail(session, &list)?;
            view.mount(session);
            finish(view.render(), view.error())
        }
        Command::Add { list, text } => {
            if text.trim().is_empty() {
                bail!("item text cannot be empty");
            }
            let mut view = detail(session, &list)?;
            view.mount(session);
            view.set_new_item_text(text);
            view.add_item(session);
            finish(view.render(), view.error())
        }
        Command::Toggle { list, item } => {
            let mut view = detail(session, &list)?;
            view.mount(session);
            let item = resolve_item(&view, &item)?;
            view.toggle_item(session, item);
            finish(view.render(), view.error())
        }
        Command::Remove { list, item } => {
            let mut view = detail(session, &list)?;
            view.mount(session);
            let item = resolve_item(&view, &item)?;
            view.delete_item(session, item);
            finish(view.render(), view.error())
        }
        Command::Rename { list, name } => {
            let mut view = detail(session, &list)?;
            session
                .rename_todo(view.id(), &name)
                .map_err(|e| anyhow!("Failed to rename todo: {e}"))?;
            view.mount(session);
            finish(view.render(), view.error())
        }
    }
}

/// Prints the view either way, but fails the process when a banner is up.
fn finish(rendered: String, error: Option<&str>) -> Result<String> {
    match error {
        Some(error) => {
            eprint!("{rendered}");
            bail!("{error}")
        }
        None => Ok(rendered),
    }
}

fn detail<T: Transport>(session: &mut Session<T>, list: &str) -> Result<Detail> {
    let id = match Reference::parse(list)? {
        Reference::Id(id) => id,
        Reference::Position(_) => resolve_list(&dashboard(session)?, list)?,
    };
    Ok(Detail::new(id))
}

/// Mounts the dashboard for position lookups. A failed fetch is reported as
/// such, not as a missing position.
fn dashboard<T: Transport>(session: &mut Session<T>) -> Result<Dashboard> {
    let mut view = Dashboard::new();
    view.mount(session);
    if let Some(error) = view.error() {
        bail!("{error}");
    }
    Ok(view)
}

fn resolve_list(view: &Dashboard, raw: &str) -> Result<Uuid> {
    match Reference::parse(raw)? {
        Reference::Id(id) => Ok(id),
        Reference::Position(position) => view
            .open(position - 1)
            .ok_or_else(|| anyhow!("there is no list number {position}")),
    }
}

fn resolve_item(view: &Detail, raw: &str) -> Result<Uuid> {
    match Reference::parse(raw)? {
        Reference::Id(id) => Ok(id),
        Reference::Position(position) => view
            .list()
            .and_then(|list| list.items.get(position - 1))
            .map(|item| item.id)
            .ok_or_else(|| anyhow!("there is no item number {position}")),
    }
}
