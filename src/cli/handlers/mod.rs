mod new;
pub use new::cmd_new;

use std::io::Read;
use std::path::Path;

use chrono::Local;
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::card_store;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::order_io;
use crate::io::project_io;
use crate::io::registry::ProjectRegistry;
use crate::model::card::DECK_SIZE;
use crate::model::project::Project;
use crate::ops::command::{self, CommandOutcome};
use crate::ops::export::{self, ExportFormat};
use crate::ops::rename;
use crate::ops::search;
use crate::parse::title_of;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Per-invocation state shared by the handlers
struct Session {
    json: bool,
    project_id: Option<String>,
    registry: ProjectRegistry,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let registry = match cli.registry {
        Some(ref path) => ProjectRegistry::open(path),
        None => ProjectRegistry::open_default(),
    };
    let mut session = Session {
        json: cli.json,
        project_id: cli.project,
        registry,
    };

    match cli.command {
        // Registry commands (don't require a project)
        Commands::New(args) => cmd_new(args, &mut session.registry),
        Commands::Projects(args) => cmd_projects(args, &mut session),

        // Read commands
        Commands::Cards => cmd_cards(&mut session),
        Commands::Show(args) => cmd_show(args, &mut session),
        Commands::Outline => cmd_outline(&mut session),
        Commands::Search(args) => cmd_search(args, &mut session),
        Commands::Status => cmd_status(&mut session),

        // Write commands
        Commands::Write(args) => cmd_write(args, &mut session),
        Commands::Swap(args) => cmd_swap(args, &mut session),
        Commands::Rename(args) => cmd_rename(args, &mut session),
        Commands::Exec(args) => cmd_exec(args, &mut session),
        Commands::Export(args) => cmd_export(args, &mut session),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl Session {
    /// Resolve the selected project (or the last opened one) and mark it opened.
    fn load_project(&mut self) -> Result<Project, Box<dyn std::error::Error>> {
        let id = match self.project_id.clone() {
            Some(id) => id,
            None => self
                .registry
                .last_project()
                .map(str::to_string)
                .ok_or("no project selected: pass --project <id> or create one with `scriptedt new`")?,
        };
        let entry = self
            .registry
            .get(&id)
            .cloned()
            .ok_or_else(|| format!("project '{}' not found", id))?;
        let project = project_io::open_project(&entry.name, Path::new(&entry.path)).map_err(|e| {
            format!(
                "{} (remove it with `scriptedt projects remove {}`)",
                e, id
            )
        })?;
        self.registry.update_last_opened(&id)?;
        Ok(project)
    }
}

fn print_card(project: &Project, card: crate::model::card::CardNumber, full: bool) -> CmdResult {
    let content = card_store::read_card(project, card)?;
    println!("{}", format_card_heading(card, &title_of(&content)));
    println!();
    if full {
        print!("{}", content);
        if !content.is_empty() && !content.ends_with('\n') {
            println!();
        }
    } else {
        println!("{}", format_preview(&content, config_io::read_config()?.preview_lines));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project registry handlers
// ---------------------------------------------------------------------------

fn cmd_projects(args: ProjectsCmd, session: &mut Session) -> CmdResult {
    match args.action {
        None | Some(ProjectsAction::List) => cmd_projects_list(session),
        Some(ProjectsAction::Open(a)) => cmd_projects_open(a, session),
        Some(ProjectsAction::Remove(a)) => cmd_projects_remove(a, session),
        Some(ProjectsAction::Delete(a)) => cmd_projects_delete(a, session),
    }
}

fn cmd_projects_list(session: &Session) -> CmdResult {
    let reg = &session.registry;
    let current = reg.last_project();

    if session.json {
        let items: Vec<ProjectJson> = reg
            .projects()
            .iter()
            .map(|(id, e)| project_to_json(id, e, current == Some(id.as_str())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if reg.projects().is_empty() {
        println!("No projects yet.");
        println!();
        println!("Run `scriptedt new \"My Script\"` to create one.");
        return Ok(());
    }

    let id_w = reg.projects().keys().map(|id| id.len()).max().unwrap_or(0).max(4);
    for (id, entry) in reg.projects() {
        println!(
            "{}",
            format_project_line(id, entry, current == Some(id.as_str()), id_w)
        );
    }
    Ok(())
}

fn cmd_projects_open(args: ProjectIdArg, session: &mut Session) -> CmdResult {
    session.project_id = Some(args.id);
    let project = session.load_project()?;
    println!("Opened: {} ({})", project.name, project.root.display());
    Ok(())
}

fn cmd_projects_remove(args: ProjectIdArg, session: &mut Session) -> CmdResult {
    let entry = session.registry.remove(&args.id)?;
    println!("Removed from list: {} (files kept at {})", entry.name, entry.path);
    Ok(())
}

fn cmd_projects_delete(args: ProjectsDeleteArgs, session: &mut Session) -> CmdResult {
    if !args.yes {
        return Err(format!(
            "refusing to delete '{}' without --yes (this removes its directory and all cards)",
            args.id
        )
        .into());
    }
    let entry = session.registry.delete_permanently(&args.id)?;
    println!("Deleted: {} ({})", entry.name, entry.path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_cards(session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let rows = project_io::deck_summary(&project)?;

    if session.json {
        let items: Vec<CardJson> = rows.iter().map(card_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let width = config_io::read_config()?.title_width;
    for row in &rows {
        println!("{}", format_card_line(row, width));
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let card = project_io::card_number(args.card)?;
    print_card(&project, card, args.full)
}

fn cmd_outline(session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let deck = project_io::load_deck(&project)?;
    print!("{}", export::render_outline(&project.name, &deck));
    Ok(())
}

fn cmd_search(args: SearchArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let re = Regex::new(&args.pattern)?;
    let hits = search::search_cards(&project, &re)?;

    if session.json {
        let items: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for hit in &hits {
        println!("{}", format_hit_line(hit));
    }
    Ok(())
}

fn cmd_status(session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let written = project_io::load_deck(&project)?.written_count();

    if session.json {
        let status = StatusJson {
            project: project.name.clone(),
            written,
            total: DECK_SIZE,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}: {}/{} cards written", project.name, written, DECK_SIZE);
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_write(args: WriteArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let card = project_io::card_number(args.card)?;

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let _lock = FileLock::acquire_default(&project.root)?;
    card_store::write_card(&project, card, &text)?;
    println!("Saved card {}", card);
    Ok(())
}

fn cmd_swap(args: SwapArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let _lock = FileLock::acquire_default(&project.root)?;

    let swapped = match (args.first.checked_sub(1), args.second.checked_sub(1)) {
        (Some(a), Some(b)) => order_io::swap_positions(&project, a, b)?,
        _ => false,
    };
    if !swapped {
        return Err(format!(
            "invalid positions: {} and {} (positions are 1-{})",
            args.first, args.second, DECK_SIZE
        )
        .into());
    }
    println!("Swapped positions {} and {}", args.first, args.second);
    Ok(())
}

fn cmd_rename(args: RenameArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let card = project_io::card_number(args.card)?;
    let title = command::clean_title(&args.title.join(" "));

    let _lock = FileLock::acquire_default(&project.root)?;
    rename::rename_card(&project, card, &title)?;
    if title.trim().is_empty() {
        println!("Cleared title of card {}", card);
    } else {
        println!("Renamed card {}", card);
    }
    Ok(())
}

fn cmd_exec(args: ExecArgs, session: &mut Session) -> CmdResult {
    let parsed = command::parse_command(&args.line)?;
    let project = session.load_project()?;

    let outcome = {
        let _lock = FileLock::acquire_default(&project.root)?;
        command::execute_command(&project, &parsed)?
    };

    match outcome {
        CommandOutcome::InvalidPositions => Err(outcome.message().into()),
        CommandOutcome::Open(card) => print_card(&project, card, true),
        _ => {
            println!("{}", outcome.message());
            Ok(())
        }
    }
}

fn cmd_export(args: ExportArgs, session: &mut Session) -> CmdResult {
    let project = session.load_project()?;
    let formats: Vec<ExportFormat> = match args.format {
        ExportTarget::Markdown => vec![ExportFormat::Markdown],
        ExportTarget::Fountain => vec![ExportFormat::Fountain],
        ExportTarget::Outline => vec![ExportFormat::Outline],
        ExportTarget::All => ExportFormat::ALL.to_vec(),
    };

    let now = Local::now().naive_local();
    let _lock = FileLock::acquire_default(&project.root)?;
    for format in formats {
        let path = export::write_export(&project, format, now)?;
        println!("Exported {} to: {}", format.label(), path.display());
    }
    Ok(())
}
