//! Render extracted form pages into the five-page dental chart.
//!
//! Usage:
//!   cargo run --release --bin render_chart -- page1.json page2.json
//!   cargo run --release --bin render_chart -- --edits edits.json --output-dir out page*.json

use odontoform::fields::UserEdits;
use odontoform::normalize::Normalizer;
use odontoform::render::DocumentAssembler;
use odontoform::schema::RawExtraction;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

struct RenderConfig {
    page_files: Vec<PathBuf>,
    edits_file: Option<PathBuf>,
    output_dir: PathBuf,
    compress: bool,
}

impl RenderConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut page_files = Vec::new();
        let mut edits_file = None;
        let mut output_dir = PathBuf::from(".");
        let mut compress = true;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--edits" => {
                    i += 1;
                    if i < args.len() {
                        edits_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--output-dir" => {
                    i += 1;
                    if i < args.len() {
                        output_dir = PathBuf::from(&args[i]);
                    }
                },
                "--no-compress" => {
                    compress = false;
                },
                other => {
                    page_files.push(PathBuf::from(other));
                },
            }
            i += 1;
        }

        Self {
            page_files,
            edits_file,
            output_dir,
            compress,
        }
    }
}

fn load_pages(files: &[PathBuf]) -> Option<RawExtraction> {
    let mut merged: Option<RawExtraction> = None;

    for file in files {
        let json = match fs::read_to_string(file) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Skipping {}: {}", file.display(), e);
                continue;
            },
        };
        match RawExtraction::from_json(&json) {
            Ok(page) => match merged.as_mut() {
                Some(base) => base.merge(page),
                None => merged = Some(page),
            },
            Err(e) => eprintln!("Skipping {}: {}", file.display(), e),
        }
    }

    merged
}

fn load_edits(file: Option<&PathBuf>) -> UserEdits {
    let Some(file) = file else {
        return UserEdits::new();
    };
    match fs::read_to_string(file).map_err(|e| e.to_string()).and_then(|json| {
        serde_json::from_str::<UserEdits>(&json).map_err(|e| e.to_string())
    }) {
        Ok(edits) => edits,
        Err(e) => {
            eprintln!("Ignoring edits file {}: {}", file.display(), e);
            UserEdits::new()
        },
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let config = RenderConfig::from_args();

    if config.page_files.is_empty() {
        eprintln!("Usage: render_chart [--edits edits.json] [--output-dir DIR] [--no-compress] PAGE.json...");
        return ExitCode::FAILURE;
    }

    let Some(raw) = load_pages(&config.page_files) else {
        eprintln!("No readable page files");
        return ExitCode::FAILURE;
    };

    let canonical = Normalizer::new().normalize(&raw);
    let edits = load_edits(config.edits_file.as_ref());

    let assembler = DocumentAssembler::new().with_compress(config.compress);
    let chart = match assembler.assemble(&canonical, &edits) {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("Render failed: {}", e);
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = fs::create_dir_all(&config.output_dir) {
        eprintln!("Cannot create {}: {}", config.output_dir.display(), e);
        return ExitCode::FAILURE;
    }

    match chart.save_to_dir(&config.output_dir) {
        Ok(path) => {
            println!("Wrote {} ({} bytes)", path.display(), chart.bytes.len());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Save failed: {}", e);
            ExitCode::FAILURE
        },
    }
}
