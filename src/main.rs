use clap::{Parser, Subcommand};
use docwatch::hooks::HookInstaller;
use docwatch::{Settings, SyncWatcher, Synchronizer, analysis};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docwatch")]
#[command(about = "Keeps README.md synchronized with the code it documents")]
#[command(version)]
struct Cli {
    /// Path to a configuration file (defaults to docwatch.toml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch source roots and synchronize continuously (default)
    Watch,

    /// Synchronize the document once and exit (for git hooks)
    Once,

    /// Install pre-commit and pre-push hooks that run one-shot syncs
    Hooks,

    /// Initialize a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration; a broken config never stops the tool
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration.");
        Settings::default()
    });

    docwatch::logging::init_with_config(&settings.logging);

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Init { force } => match Settings::init_config_file(force) {
            Ok(path) => println!("Created configuration at: {}", path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },

        Commands::Config => match toml::to_string_pretty(&settings) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },

        Commands::Once => {
            let synchronizer = Synchronizer::new(settings);
            let report = synchronizer.run_once();
            // The single line git hooks expect on stdout; diagnostics have
            // already gone to stderr
            println!(
                "{} updated ({} files, {} symbols)",
                synchronizer.settings().readme_path.display(),
                report.files_scanned,
                report.symbols_found
            );
        }

        Commands::Hooks => {
            let installer = HookInstaller::new(
                settings.root(),
                analysis::path_key(&settings.readme_path),
            );
            match installer.install() {
                Ok(installed) => {
                    println!("Git hooks installed successfully:");
                    for path in installed {
                        println!("  - {}", path.display());
                    }
                }
                Err(e) => {
                    eprintln!("Error installing hooks: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Watch => {
            let synchronizer = Synchronizer::new(settings);
            let watcher = match SyncWatcher::new(synchronizer) {
                Ok(watcher) => watcher,
                Err(e) => {
                    eprintln!("Error starting watcher: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = watcher.watch().await {
                eprintln!("Watcher error: {e}");
                std::process::exit(1);
            }
        }
    }
}
