use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bufscope::host::WindowState;
use bufscope::{
    util, CallContext, IsolateOutcome, ItemHost, ItemId, ListOptions, MemoryHost, RestoreMode,
    RestoreOutcome, ScopeEngine, ScopeHost, ScopeId, ScopeRef, Settings,
};
use clap::{Parser, Subcommand};

/// Inspect and edit per-scope item membership in a world file
#[derive(Debug, Parser)]
#[command(name = "bufscope", version, about)]
struct Cli {
    /// Data directory (defaults to ~/.bufscope)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// World file (defaults to <data-dir>/world.json)
    #[arg(long, global = true)]
    world: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a scope's items
    List {
        #[arg(long)]
        scope: Option<ScopeId>,
        /// Include buried items regardless of the config toggle
        #[arg(long)]
        buried: bool,
        /// Include hidden items
        #[arg(long)]
        hidden: bool,
    },
    /// Items captured by any scope
    Captured {
        #[arg(long)]
        excluding: Option<ScopeId>,
    },
    /// Live items captured by no scope
    Orphans,
    /// Items only this scope captures
    Exclusive {
        #[arg(long)]
        scope: Option<ScopeId>,
        /// Items this scope shares with others instead
        #[arg(long)]
        invert: bool,
    },
    /// Reset a scope to its focused item
    Clear {
        #[arg(long)]
        scope: Option<ScopeId>,
    },
    /// Remove an item from a scope
    Remove {
        #[arg(long)]
        scope: Option<ScopeId>,
        item: String,
    },
    /// Bury an item and remove it from a scope
    Bury {
        #[arg(long)]
        scope: Option<ScopeId>,
        item: String,
    },
    /// Remove every item shared with another scope
    RemoveShared {
        #[arg(long)]
        scope: Option<ScopeId>,
    },
    /// Destroy a scope's exclusive items
    KillExclusive {
        #[arg(long)]
        scope: Option<ScopeId>,
        /// Destroy every item of the scope, shared or not
        #[arg(long)]
        all: bool,
    },
    /// Destroy orphaned items
    KillOrphans,
    /// Remove items from other projects
    Isolate {
        #[arg(long)]
        scope: Option<ScopeId>,
        #[arg(long)]
        file_only: bool,
    },
    /// Print a scope's window state with membership embedded
    Capture {
        #[arg(long)]
        scope: Option<ScopeId>,
    },
    /// Apply a captured window state to a scope
    Restore {
        #[arg(long)]
        scope: Option<ScopeId>,
        /// JSON file produced by `capture`
        #[arg(long)]
        state: PathBuf,
        /// Allow restoring into a scope that is not live yet
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.bufscope/logs/bufscope.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Settings::load(),
    };
    let engine = ScopeEngine::new(settings);

    let world_path = cli.world.clone().unwrap_or_else(util::world_path);
    let mut host = load_world(&world_path)?;

    if run(&engine, &mut host, cli.command)? {
        save_world(&world_path, &host)?;
    }
    Ok(())
}

/// Execute one command. Returns whether the world changed.
fn run(engine: &ScopeEngine, host: &mut MemoryHost, command: Command) -> Result<bool> {
    match command {
        Command::List {
            scope,
            buried,
            hidden,
        } => {
            let scope = resolve(host, scope)?;
            let options =
                ListOptions::new(buried || engine.settings().include_buried, hidden);
            print_items(host, &engine.compute_list_with(&*host, scope, options));
            Ok(false)
        }
        Command::Captured { excluding } => {
            let captured = engine.captured(&*host, excluding);
            let ordered: Vec<ItemId> = host
                .items()
                .into_iter()
                .filter(|item| captured.contains(item))
                .collect();
            print_items(host, &ordered);
            Ok(false)
        }
        Command::Orphans => {
            print_items(host, &engine.orphans(&*host));
            Ok(false)
        }
        Command::Exclusive { scope, invert } => {
            let scope = resolve(host, scope)?;
            print_items(host, &engine.exclusive(&*host, scope, invert));
            Ok(false)
        }
        Command::Clear { scope } => {
            let scope = resolve(host, scope)?;
            engine.clear(host, scope);
            Ok(true)
        }
        Command::Remove { scope, item } => {
            let scope = resolve(host, scope)?;
            let item = lookup(host, &item)?;
            Ok(engine.remove(host, scope, item))
        }
        Command::Bury { scope, item } => {
            let scope = resolve(host, scope)?;
            let item = lookup(host, &item)?;
            engine.bury(host, scope, item);
            Ok(true)
        }
        Command::RemoveShared { scope } => {
            let scope = resolve(host, scope)?;
            let removed = engine.remove_non_exclusive(host, scope);
            print_items(host, &removed);
            Ok(!removed.is_empty())
        }
        Command::KillExclusive { scope, all } => {
            let scope = resolve(host, scope)?;
            let killed = engine.kill_exclusive(host, scope, all);
            print_killed(host, &killed);
            Ok(!killed.is_empty())
        }
        Command::KillOrphans => {
            let killed = engine.kill_orphans(host);
            print_killed(host, &killed);
            Ok(!killed.is_empty())
        }
        Command::Isolate { scope, file_only } => {
            let scope = resolve(host, scope)?;
            match engine.isolate_by_project(host, scope, file_only) {
                IsolateOutcome::NoProject => {
                    println!("Scope {} has no current project", scope);
                    Ok(false)
                }
                IsolateOutcome::Isolated { removed, .. } => {
                    print_items(host, &removed);
                    Ok(!removed.is_empty())
                }
            }
        }
        Command::Capture { scope } => {
            let scope = resolve(host, scope)?;
            let state = engine.capture_state(&*host, &CallContext::new(), scope);
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(false)
        }
        Command::Restore {
            scope,
            state,
            force,
        } => {
            let scope = resolve(host, scope)?;
            let contents = fs::read_to_string(&state)
                .with_context(|| format!("Failed to read state {}", state.display()))?;
            let state: WindowState = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid state {}", state.display()))?;
            let mode = if force {
                RestoreMode::Forced
            } else {
                RestoreMode::Enabled
            };
            let ctx = CallContext::with_restore(mode);
            let focused = host.focused_item(scope);
            match engine.restore_state(host, &ctx, &state, scope, focused) {
                RestoreOutcome::Restored { active, dropped } => {
                    print_items(host, &active);
                    if dropped > 0 {
                        eprintln!("{} recorded item(s) no longer exist", dropped);
                    }
                    Ok(true)
                }
                RestoreOutcome::NotPermitted => {
                    anyhow::bail!("Scope {} is not live; pass --force to restore anyway", scope)
                }
                other => {
                    eprintln!("Nothing restored: {:?}", other);
                    Ok(false)
                }
            }
        }
    }
}

fn resolve(host: &MemoryHost, scope: Option<ScopeId>) -> Result<ScopeId> {
    scope
        .map(ScopeRef::from)
        .unwrap_or_default()
        .resolve(host)
        .context("No scope given and the world has no current scope")
}

fn lookup(host: &MemoryHost, name: &str) -> Result<ItemId> {
    host.lookup_by_name(name)
        .with_context(|| format!("No live item named {:?}", name))
}

fn print_items(host: &MemoryHost, items: &[ItemId]) {
    for name in host.names(items) {
        println!("{}", name);
    }
}

/// Killed items are dead, so their names come from the registry entry
fn print_killed(host: &MemoryHost, killed: &[ItemId]) {
    for item in killed.iter().filter_map(|id| host.item(*id)) {
        println!("{}", item.name);
    }
}

fn load_world(path: &Path) -> Result<MemoryHost> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read world {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid world {}", path.display()))
}

fn save_world(path: &Path, host: &MemoryHost) -> Result<()> {
    let contents = serde_json::to_string_pretty(host)?;
    fs::write(path, contents).with_context(|| format!("Failed to write world {}", path.display()))
}
