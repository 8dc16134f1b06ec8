use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ifc_compressor::error::ReadError;
use ifc_compressor::export::{export_json, export_table, export_text};
use ifc_compressor::parser::read_ifc_file;
use ifc_compressor::pipeline::{compress_all, compress_table, detect_input, DetectedInput};
use ifc_compressor::reference::DEFAULT_DATABASE_PATH;
use ifc_compressor::ui::ReviewApp;
use ifc_compressor::{
    rewrite_material_names, suggest_replacements, ReferenceDatabase, ReplacementMap,
};

#[derive(Parser, Debug)]
#[command(name = "ifc-compressor")]
#[command(about = "IFC Compressor - per-material volume, CO2 and cost tables from IFC models")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the aggregated material table
    Compress {
        /// IFC STEP files, compact JSON models or data URIs; several are
        /// combined into one table
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Approved replacement map (JSON object)
        #[arg(long, value_name = "MAP")]
        replacements: Option<PathBuf>,

        #[command(flatten)]
        database: DatabaseArg,

        /// Write the table to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List every material with its reference database matches
    Suggest {
        file: PathBuf,

        #[command(flatten)]
        database: DatabaseArg,

        /// Write the suggestions as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Rename materials in an IFC file
    Rewrite {
        file: PathBuf,

        #[arg(long, value_name = "MAP")]
        replacements: PathBuf,

        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,
    },

    /// Review suggestions interactively, then rewrite and compress
    Review {
        file: PathBuf,

        #[command(flatten)]
        database: DatabaseArg,

        /// Where to write the rewritten IFC file
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Where to write the approved replacement map
        #[arg(long, value_name = "FILE")]
        map_out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct DatabaseArg {
    /// Reference material file (`;`-delimited)
    #[arg(
        long = "database",
        value_name = "FILE",
        env = "IFC_COMPRESSOR_DATABASE",
        default_value = DEFAULT_DATABASE_PATH
    )]
    path: PathBuf,
}

impl DatabaseArg {
    fn load(&self) -> ReferenceDatabase {
        ReferenceDatabase::load(&self.path)
    }
}

fn load_replacements(path: &Path) -> Result<ReplacementMap, ReadError> {
    let text = read_ifc_file(path)?;
    serde_json::from_str(&text).map_err(|source| ReadError::InvalidReplacementMap {
        path: path.to_path_buf(),
        source,
    })
}

fn print_or_export(
    input: &str,
    db: &ReferenceDatabase,
    map: Option<&ReplacementMap>,
    output: Option<&Path>,
) -> Result<()> {
    match (compress_table(input, db, map), output) {
        (Some(table), Some(path)) => {
            export_table(&table, path)?;
            println!("Exported table: {}", path.display());
        }
        (Some(table), None) => println!("{table}"),
        // Unrecognized input is passed through unchanged.
        (None, Some(path)) => export_text(input, path)?,
        (None, None) => print!("{input}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Compress {
            files,
            replacements,
            database,
            output,
        } => {
            let inputs = files
                .iter()
                .map(read_ifc_file)
                .collect::<Result<Vec<_>, _>>()?;
            let map = replacements.as_deref().map(load_replacements).transpose()?;
            let db = database.load();

            if let [input] = inputs.as_slice() {
                print_or_export(input, &db, map.as_ref(), output.as_deref())?;
            } else {
                let table = compress_all(inputs.iter().map(String::as_str), &db, map.as_ref());
                match &output {
                    Some(path) => {
                        export_table(&table, path)?;
                        println!("Exported table: {}", path.display());
                    }
                    None => println!("{table}"),
                }
            }
        }

        Command::Suggest {
            file,
            database,
            json,
        } => {
            let input = read_ifc_file(&file)?;
            let suggestions = suggest_replacements(&input, &database.load());

            if let Some(json_path) = &json {
                export_json(&suggestions, json_path)?;
                println!("Exported to JSON: {}", json_path.display());
            } else {
                for s in &suggestions {
                    println!("{} -> {}", s.original, s.suggestions.join(" | "));
                }
            }
        }

        Command::Rewrite {
            file,
            replacements,
            output,
        } => {
            let input = read_ifc_file(&file)?;
            let map = load_replacements(&replacements)?;
            export_text(&rewrite_material_names(&input, &map), &output)?;
            println!("Rewrote IFC: {}", output.display());
        }

        Command::Review {
            file,
            database,
            output,
            map_out,
        } => {
            let input = read_ifc_file(&file)?;
            let db = database.load();
            let suggestions = suggest_replacements(&input, &db);

            let terminal = ratatui::init();
            let result = ReviewApp::new(suggestions).run(terminal);
            ratatui::restore();

            let Some(map) = result? else {
                println!("Review aborted, nothing written");
                return Ok(());
            };

            if let Some(map_path) = &map_out {
                export_json(&map, map_path)?;
                println!("Exported replacement map: {}", map_path.display());
            }

            // Only STEP text carries material names that can be rewritten.
            if let Some(out_path) = &output {
                if let DetectedInput::Step(text) = detect_input(&input) {
                    export_text(&rewrite_material_names(&text, &map), out_path)?;
                    println!("Rewrote IFC: {}", out_path.display());
                } else {
                    tracing::warn!("Input is not IFC STEP text, skipping rewrite");
                }
            }

            print_or_export(&input, &db, Some(&map), None)?;
        }
    }

    Ok(())
}
