//! CLI entry point for questline
//!
//! This provides a command-line interface for playing and validating quest
//! campaigns.

use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "play" => {
            if args.len() < 3 {
                eprintln!("Error: Missing content directory path");
                eprintln!();
                print_usage();
                process::exit(1);
            }
            let content_dir = PathBuf::from(&args[2]);
            let save_dir = args
                .get(3)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("saves"));
            if let Err(error) = block_on(questline::cli::play::run_play(content_dir, save_dir)) {
                eprintln!("Error: {error}");
                process::exit(1);
            }
        }
        "validate" => {
            if args.len() < 3 {
                eprintln!("Error: Missing content directory path");
                eprintln!();
                print_usage();
                process::exit(1);
            }
            let content_dir = PathBuf::from(&args[2]);
            if let Err(error) = block_on(run_validate(content_dir)) {
                eprintln!("Error: {error}");
                process::exit(1);
            }
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Error: Unknown command '{command}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build async runtime")
        .block_on(future)
}

/// Load a content directory and audit its story graph without playing it
async fn run_validate(content_dir: PathBuf) -> anyhow::Result<()> {
    use questline::domain::services::ProgressionService;
    use questline::infrastructure::content::InMemoryContentStore;
    use questline::ContentStore;

    let store = InMemoryContentStore::load_from_dir(&content_dir).await?;
    ProgressionService::new().validate_story_graph(&store)?;
    println!(
        "OK: {} quests, {} scenes, digest {}",
        store.list_quests().len(),
        store.list_scenes().len(),
        store.digest()
    );
    Ok(())
}

fn print_usage() {
    println!("questline - Narrative Quest Engine");
    println!();
    println!("USAGE:");
    println!("    questline play <content-dir> [save-dir]");
    println!("    questline validate <content-dir>");
    println!();
    println!("COMMANDS:");
    println!("    play <content-dir> [save-dir]    Play a campaign in CUI mode");
    println!("    validate <content-dir>           Check a campaign's story graph");
    println!("    --help, -h                       Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    questline play campaigns/lightning-thief");
    println!("    questline validate campaigns/lightning-thief");
}
