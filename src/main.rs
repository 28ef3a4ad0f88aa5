use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use log::{LevelFilter, debug, info};
use serde::Serialize;

use md2notion::{Config, Root};

#[derive(Parser)]
#[command(name = "md2notion")]
#[command(about = "Convert Markdown files to Notion block JSON")]
struct Cli {
    /// Input Markdown file (or mdast JSON with --ast)
    input: PathBuf,

    /// Output JSON file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a rich-text array instead of blocks; the input must be a single paragraph
    #[arg(long)]
    inline: bool,

    /// Read the input as an mdast JSON tree instead of Markdown
    #[arg(long)]
    ast: bool,

    /// Print the parsed tree as mdast JSON and exit
    #[arg(long, conflicts_with = "ast")]
    emit_ast: bool,

    /// Config file
    #[arg(short, long, default_value = "md2notion.toml")]
    config: PathBuf,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    debug!("using config {config:?}");
    let pretty = config.output.pretty && !cli.compact;

    // Read input file
    let input = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => fail(format!("Error reading {}: {}", cli.input.display(), e)),
    };

    let root = if cli.ast {
        match serde_json::from_str::<Root>(&input) {
            Ok(root) => root,
            Err(e) => fail(format!("Invalid mdast JSON in {}: {}", cli.input.display(), e)),
        }
    } else {
        md2notion::parse_with_config(&input, &config)
    };
    info!(
        "parsed {} with {} top-level nodes",
        cli.input.display(),
        root.children.len()
    );

    let json = if cli.emit_ast {
        to_json(&root, pretty)
    } else if cli.inline {
        match md2notion::convert_inline_only(&root) {
            Ok(runs) => to_json(&runs, pretty),
            Err(e) => fail(e),
        }
    } else {
        to_json(&md2notion::convert_document(&root), pretty)
    };

    match cli.output {
        Some(output) => write_output(&output, json),
        None => println!("{json}"),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match result {
        Ok(json) => json,
        Err(e) => fail(format!("Error serializing output: {}", e)),
    }
}

fn write_output(path: &Path, json: String) {
    if let Err(e) = fs::write(path, json) {
        fail(format!("Error writing {}: {}", path.display(), e));
    }
    info!("wrote {}", path.display());
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
