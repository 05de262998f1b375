//! Labfolio CLI: resolve and create study folders and save files into them.
//!
//! The storage backend is configured through the environment (see
//! `StorageConfig::from_env`); entities are described with the global
//! `--program`, `--study` and `--assay` flags.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use labfolio_cli::{init_tracing, Entity, EntityArgs, EntityKind};
use labfolio_core::{NamingOptions, StorageConfig};
use labfolio_storage::{create_storage, NamingService, StudyStorage};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "labfolio", about = "Labfolio study storage CLI")]
struct Cli {
    #[command(flatten)]
    entity: EntityArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the folder of a program, study or assay
    Get {
        #[arg(value_enum)]
        kind: EntityKind,
        /// List files and sub-folders down to the configured depth
        #[arg(long)]
        contents: bool,
    },
    /// Create the folder of a program, study or assay (parents are created as needed)
    Create {
        #[arg(value_enum)]
        kind: EntityKind,
    },
    /// Save a local file into an entity's folder
    Save {
        /// Path to the file to save
        file: PathBuf,
        /// Entity whose folder receives the file
        #[arg(long, value_enum)]
        owner: EntityKind,
    },
    /// Preview the next generated code
    Code {
        #[arg(value_enum)]
        kind: CodeKind,
        /// Number of codes already issued in the sequence
        #[arg(long, default_value = "0")]
        existing: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CodeKind {
    Study,
    Assay,
    External,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn storage() -> anyhow::Result<Arc<dyn StudyStorage>> {
    let config = StorageConfig::from_env().context("Failed to load storage configuration")?;
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let args = &cli.entity;

    match cli.command {
        Commands::Get { kind, contents } => {
            let entity = args.entity(kind)?;
            let folder = storage()
                .await?
                .get_folder(entity.entity_ref(), contents)
                .await?;
            print_json(&folder)?;
        }
        Commands::Create { kind } => {
            let storage = storage().await?;
            let folder = match args.entity(kind)? {
                Entity::Program(program) => storage.create_program_folder(&program).await?,
                Entity::Study(study) => storage.create_study_folder(&study).await?,
                Entity::Assay(assay) => storage.create_assay_folder(&assay).await?,
            };
            print_json(&folder)?;
        }
        Commands::Save { file, owner } => {
            let entity = args.entity(owner)?;
            let saved = storage()
                .await?
                .save_file(&file, entity.entity_ref())
                .await?;
            print_json(&saved)?;
        }
        Commands::Code { kind, existing } => {
            let options = match StorageConfig::from_env() {
                Ok(config) => config.naming,
                Err(e) => {
                    tracing::debug!(error = %e, "Using default naming options");
                    NamingOptions::default()
                }
            };
            let naming = NamingService::new(options);
            let code = match kind {
                CodeKind::Study => naming.study_code(&args.program()?, existing),
                CodeKind::Assay => naming.assay_code(&args.study()?, existing),
                CodeKind::External => naming.external_study_code(existing),
            };
            print_json(&serde_json::json!({ "code": code }))?;
        }
    }

    Ok(())
}
