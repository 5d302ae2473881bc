//! Generals replay (.rep) parser CLI
//!
//! A command-line interface for inspecting, validating and batch-exporting
//! replay headers.
//!
//! ## Commands
//!
//! - `info` - Display quick replay metadata
//! - `parse` - Parse a replay with output format options
//! - `validate` - Validate replay format (exit codes for scripting)
//! - `batch` - Export every replay under a directory as JSON lines

use clap::{Parser, Subcommand, ValueEnum};
use genrep_parser::format::detect_game_type;
use genrep_parser::binary::ByteReader;
use genrep_parser::{
    DecodeOptions, JsonLinesSink, ParserError, Replay, ReplayFile, ReplaySink, Slot,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Generals replay (.rep) parser
#[derive(Parser)]
#[command(name = "genrep")]
#[command(about = "Generals replay (.rep) parser", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display replay information
    Info {
        /// Path to the replay file
        file: PathBuf,
    },
    /// Parse a replay file
    Parse {
        /// Path to the replay file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Map every computer difficulty to easy, like older tooling did
        #[arg(long)]
        legacy_difficulty: bool,
    },
    /// Validate replay format
    Validate {
        /// Path to the replay file
        file: PathBuf,
        /// Verbose error reporting
        #[arg(short, long)]
        verbose: bool,
    },
    /// Decode every replay under a directory tree
    Batch {
        /// Directory containing replay files
        directory: PathBuf,
        /// Output file for JSON lines (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Continue on errors
        #[arg(long)]
        continue_on_error: bool,
        /// Map every computer difficulty to easy, like older tooling did
        #[arg(long)]
        legacy_difficulty: bool,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn decode_options(legacy_difficulty: bool) -> DecodeOptions {
    if legacy_difficulty {
        DecodeOptions::legacy()
    } else {
        DecodeOptions::default()
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => cmd_info(&file),
        Commands::Parse {
            file,
            output,
            legacy_difficulty,
        } => cmd_parse(&file, &output, &decode_options(legacy_difficulty)),
        Commands::Validate { file, verbose } => cmd_validate(&file, verbose),
        Commands::Batch {
            directory,
            output,
            continue_on_error,
            legacy_difficulty,
        } => cmd_batch(
            &directory,
            output.as_deref(),
            continue_on_error,
            &decode_options(legacy_difficulty),
        ),
    }
}

/// Opens, decodes and closes one replay file.
fn decode_file(path: &Path, options: &DecodeOptions) -> Result<ReplayFile, ParserError> {
    let file = File::open(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ReplayFile::read(BufReader::new(file), name, options)
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path) -> ExitCode {
    match decode_file(file, &DecodeOptions::default()) {
        Ok(replay_file) => {
            print_pretty(&replay_file);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error parsing replay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_pretty(replay_file: &ReplayFile) {
    let replay = &replay_file.replay;
    let metadata = &replay.metadata;

    println!("=== Replay Information ===\n");

    println!("File:");
    println!("  Name: {}", replay_file.file_name);
    println!("  Stored name: {}", replay.filename);
    println!("  Game: {}", replay.game_type);

    println!();

    println!("Match:");
    println!("  Start: {}", replay.start_time.format("%Y-%m-%d %H:%M:%S"));
    println!("  End: {}", replay.end_time.format("%Y-%m-%d %H:%M:%S"));
    println!("  Duration: {}", replay.duration_string());
    println!("  Timecodes: {}", replay.timecode_count);
    println!("  Game speed: {}", replay.game_speed);

    println!();

    println!("Client:");
    println!("  Version: {} ({})", replay.version, replay.version_string());
    println!("  Build: {}", replay.build_date);

    println!();

    println!("Map:");
    println!("  File: {}", metadata.map_file);
    println!("  CRC: {:08X}", metadata.map_crc);
    println!("  Size: {} bytes", metadata.map_size);
    println!("  Starting credits: {}", metadata.starting_credits);

    println!();

    println!("Slots:");
    for (seat, slot) in metadata.occupied_slots() {
        match slot {
            Slot::Human(h) => println!(
                "  {}: {} [{:X}] color {} faction {} start {} team {}",
                seat, h.name, h.user_id, h.color, h.faction, h.start_position, h.team
            ),
            Slot::Computer(c) => println!(
                "  {}: Computer ({:?}) color {} faction {} start {} team {}",
                seat, c.difficulty, c.color, c.faction, c.start_position, c.team
            ),
            Slot::Empty => {}
        }
    }
}

// ============================================================================
// Parse Command Implementation
// ============================================================================

fn cmd_parse(file: &Path, output: &OutputFormat, options: &DecodeOptions) -> ExitCode {
    let replay_file = match decode_file(file, options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&replay_file) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Pretty => print_pretty(&replay_file),
    }

    ExitCode::SUCCESS
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

struct ValidationResult {
    readable: bool,
    format_valid: bool,
    header_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.readable && self.format_valid && self.header_valid
    }
}

fn cmd_validate(file: &Path, verbose: bool) -> ExitCode {
    let result = validate_replay(file);

    if verbose {
        print_validation_details(&result, file);
    } else {
        print_validation_summary(&result, file);
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_replay(file: &Path) -> ValidationResult {
    let mut result = ValidationResult {
        readable: false,
        format_valid: false,
        header_valid: false,
        errors: Vec::new(),
    };

    // Step 1: Read file
    let data = match std::fs::read(file) {
        Ok(d) => {
            result.readable = true;
            d
        }
        Err(e) => {
            result.errors.push(format!("Failed to read file: {}", e));
            return result;
        }
    };

    // Step 2: Validate variant tag
    match detect_game_type(&mut ByteReader::new(&data)) {
        Ok(game_type) if game_type.is_supported() => result.format_valid = true,
        Ok(game_type) => {
            result
                .errors
                .push(ParserError::UnsupportedVariant(game_type).to_string());
            return result;
        }
        Err(e) => {
            result.errors.push(format!("Format detection failed: {}", e));
            return result;
        }
    }

    // Step 3: Validate the full header
    match Replay::parse(&data) {
        Ok(_) => result.header_valid = true,
        Err(e) => result.errors.push(format!("Header parsing failed: {}", e)),
    }

    result
}

fn print_validation_summary(result: &ValidationResult, file: &Path) {
    let status = if result.is_valid() { "VALID" } else { "INVALID" };
    println!("{}: {}", file.display(), status);
}

fn print_validation_details(result: &ValidationResult, file: &Path) {
    println!("Validating: {}\n", file.display());

    println!("Checks:");
    println!("  File read:         {}", status_icon(result.readable));
    println!("  Format detection:  {}", status_icon(result.format_valid));
    println!("  Header parsing:    {}", status_icon(result.header_valid));

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    println!(
        "\nResult: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn status_icon(valid: bool) -> &'static str {
    if valid {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

fn cmd_batch(
    directory: &Path,
    output: Option<&Path>,
    continue_on_error: bool,
    options: &DecodeOptions,
) -> ExitCode {
    let replays = find_replays(directory);

    if replays.is_empty() {
        error!(directory = %directory.display(), "no .rep files found");
        return ExitCode::FAILURE;
    }

    info!(count = replays.len(), "found replay files");

    let writer: Box<dyn Write> = match output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to create output file");
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = JsonLinesSink::new(writer);

    // Decoding is independent per file; results keep the sorted path order.
    let results: Vec<(&PathBuf, Result<ReplayFile, ParserError>)> = replays
        .par_iter()
        .map(|path| (path, decode_file(path, options)))
        .collect();

    let mut error_count = 0;

    for (path, result) in results {
        match result {
            Ok(replay_file) => {
                debug!(path = %path.display(), "decoded replay");
                if let Err(e) = sink.store(&replay_file) {
                    error!(path = %path.display(), error = %e, "failed to store replay");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to decode replay");
                error_count += 1;
                if !continue_on_error {
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if let Err(e) = sink.flush() {
        error!(error = %e, "failed to flush output");
        return ExitCode::FAILURE;
    }

    info!(
        total = replays.len(),
        stored = sink.stored(),
        failed = error_count,
        "batch complete"
    );

    ExitCode::SUCCESS
}

fn find_replays(directory: &Path) -> Vec<PathBuf> {
    let mut replays: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("rep"))
        })
        .collect();

    replays.sort();
    replays
}
