use clap::Parser;
use kronos::application::autosave::write_stream;
use kronos::application::init::{create_workspace, open_workspace};
use kronos::application::{
    list_notes, AppContext, ConfigService, ListOptions, ListTagsService, OpenEntryService,
};
use kronos::cli::{
    format_config, format_note, format_note_list, format_tag_list, format_workspace_list, Cli,
    Commands, NoteCommand, PromptPicker, WorkspaceCommand,
};
use kronos::domain::{MetadataPatch, NoteType};
use kronos::error::KronosError;
use kronos::infrastructure::{ChosenDirectory, DirectoryPicker};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "kronos=debug" } else { "kronos=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), KronosError> {
    let mut ctx = AppContext::open(cli.store)?;
    let open_in_editor = !cli.no_edit;

    match cli.command {
        Some(Commands::Week { time_ref }) => {
            let note = OpenEntryService::new(&ctx).open_week(&time_ref, open_in_editor)?;
            println!("{}", note.path.display());
            Ok(())
        }
        Some(Commands::Workspace(command)) => run_workspace(&mut ctx, command),
        Some(Commands::Note(command)) => run_note(&ctx, command),
        Some(Commands::Tags { note_type }) => {
            let tags = ListTagsService::new(&ctx).execute(note_type)?;
            println!("{}", format_tag_list(&tags).trim_end());
            Ok(())
        }
        Some(Commands::Config { key, value, list }) => {
            let service = ConfigService::new(&ctx);

            if list {
                print!("{}", format_config(&service.list()?));
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: kronos config [--list | <key> [<value>]]");
                println!("Valid keys: editor, debounce_ms, created");
            }
            Ok(())
        }
        None => {
            let time_ref = cli.time_ref.as_deref().unwrap_or("today");
            let note = OpenEntryService::new(&ctx).open_entry(time_ref, open_in_editor)?;
            println!("{}", note.path.display());
            Ok(())
        }
    }
}

fn run_workspace(ctx: &mut AppContext, command: WorkspaceCommand) -> Result<(), KronosError> {
    match command {
        WorkspaceCommand::Create { name, dir } => {
            let ws = create_workspace(ctx, &name, &*picker(dir))?;
            println!("Created Kronosphere '{}' at {}", ws.name, ws.root_path.display());
        }
        WorkspaceCommand::Open { dir } => {
            let ws = open_workspace(ctx, &*picker(dir))?;
            println!("Opened Kronosphere '{}' at {}", ws.name, ws.root_path.display());
        }
        WorkspaceCommand::List => {
            println!("{}", format_workspace_list(ctx.registry().list()).trim_end());
        }
        WorkspaceCommand::Use { dir } => {
            let ws = ctx.registry_mut().set_active(&dir)?;
            println!("Switched to '{}' at {}", ws.name, ws.root_path.display());
        }
        WorkspaceCommand::Current => {
            let ws = ctx.registry().active().ok_or(KronosError::NoActiveWorkspace)?;
            println!("{}  {}", ws.name, ws.root_path.display());
        }
    }
    Ok(())
}

fn run_note(ctx: &AppContext, command: NoteCommand) -> Result<(), KronosError> {
    let store = ctx.notes();

    match command {
        NoteCommand::New {
            content,
            note_type,
            id,
            stdin,
        } => {
            let content = if stdin {
                read_stdin()?
            } else {
                content.unwrap_or_default()
            };
            let note = store.create(&content, note_type, id.as_deref())?;
            println!("{}", note.path.display());
        }
        NoteCommand::Show {
            id,
            note_type,
            meta,
        } => {
            let loaded = store.load(&id, note_type)?;
            if !loaded.exists {
                return Err(KronosError::NotFound { id, note_type });
            }
            print!("{}", format_note(&loaded.note, meta));
        }
        NoteCommand::Write {
            id,
            content,
            note_type,
            stdin,
        } => {
            let note = if stdin {
                write_stream(ctx, &id, note_type, io::stdin().lock())?
            } else {
                store.update(&id, note_type, &content.unwrap_or_default())?
            };
            println!("{}", note.path.display());
        }
        NoteCommand::Rm { id, note_type } => {
            store.delete(&id, note_type)?;
            println!("Deleted {}/{}", note_type, id);
        }
        NoteCommand::Ls {
            note_type,
            tag,
            limit,
        } => {
            let options = ListOptions {
                note_type,
                tag,
                limit,
            };
            let notes = list_notes(ctx, &options)?;
            println!("{}", format_note_list(&notes).trim_end());
        }
        NoteCommand::Tag {
            id,
            tags,
            note_type,
            remove,
        } => {
            require_existing(ctx, &id, note_type)?;
            let patch = if remove {
                MetadataPatch {
                    remove_tags: tags,
                    ..Default::default()
                }
            } else {
                MetadataPatch {
                    add_tags: tags,
                    ..Default::default()
                }
            };
            let note = store.update_metadata(&id, note_type, &patch)?;
            println!("{}", note.metadata.tags.join(", "));
        }
        NoteCommand::Set {
            id,
            properties,
            note_type,
            unset,
        } => {
            require_existing(ctx, &id, note_type)?;
            let patch = MetadataPatch {
                set_properties: properties.into_iter().collect(),
                remove_properties: unset,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(KronosError::Config(
                    "Nothing to change: pass KEY=VALUE or --unset KEY".to_string(),
                ));
            }
            let note = store.update_metadata(&id, note_type, &patch)?;
            for (key, value) in &note.metadata.properties {
                println!("{}: {}", key, value);
            }
        }
    }
    Ok(())
}

fn picker(dir: Option<std::path::PathBuf>) -> Box<dyn DirectoryPicker> {
    match dir {
        Some(dir) => Box::new(ChosenDirectory(Some(dir))),
        None => Box::new(PromptPicker),
    }
}

/// Metadata edits only apply to notes that already exist
fn require_existing(ctx: &AppContext, id: &str, note_type: NoteType) -> Result<(), KronosError> {
    if ctx.notes().load(id, note_type)?.exists {
        Ok(())
    } else {
        Err(KronosError::NotFound {
            id: id.to_string(),
            note_type,
        })
    }
}

fn read_stdin() -> Result<String, KronosError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
