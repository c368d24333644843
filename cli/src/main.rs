use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use networkd_schema_core::{ConfigKind, validate_document};
use networkd_schema_diff::{DeriveOptions, derive_release, diff, set_id};
use networkd_schema_mining::{SourceCheckout, generate_document, mine_config};
use networkd_schema_store::{StoreLayout, load_document, write_document_if_changed};

/// Releases the batch build processes, newest first.
const RELEASES: &[&str] = &[
    "v259", "v258", "v257", "v256", "v255", "v254", "v253", "v252", "v251", "v250", "v249",
    "v248", "v247", "v246", "v245", "v244", "v243", "v242", "v241", "v240", "v239", "v238",
    "v237",
];

/// Release whose hand-curated documents anchor the lineage.
const BASE_RELEASE: &str = "v257";

#[derive(Debug, Parser)]
#[command(name = "networkd-schema")]
#[command(about = "Generate and derive networkd configuration schemas")]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mine one release's sources into generated schema documents.
    Generate(GenerateArgs),
    /// Derive a curated document for a target release.
    Derive(DeriveArgs),
    /// Print the structural diff between two schema documents.
    Diff(DiffArgs),
    /// Structurally validate schema documents.
    Validate(ValidateArgs),
    /// Generate, derive, and validate every supported release.
    Build(BuildArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Release tag to mine (e.g. v257).
    #[arg(long)]
    version: String,
    /// Output directory for generated documents.
    #[arg(long)]
    out: PathBuf,
    /// Existing systemd source tree; fetched from upstream when omitted.
    #[arg(long)]
    source: Option<PathBuf>,
    /// Rewrite output files even when unchanged.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct DeriveArgs {
    /// Hand-curated document for the base release.
    #[arg(long)]
    curated_base: PathBuf,
    /// Generated snapshot for the base release.
    #[arg(long)]
    generated_base: PathBuf,
    /// Generated snapshot for the target release.
    #[arg(long)]
    generated_target: PathBuf,
    /// Output path for the derived curated document.
    #[arg(long)]
    out: PathBuf,
    /// Canonical `$id` URL for the derived document.
    #[arg(long)]
    id_url: String,
    /// Target release tag (e.g. v241).
    #[arg(long)]
    release: String,
    /// Base release tag the curated document belongs to.
    #[arg(long, default_value = BASE_RELEASE)]
    base_release: String,
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// Base schema document.
    #[arg(long)]
    base: PathBuf,
    /// Target schema document.
    #[arg(long)]
    target: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema document files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Repository root holding curated/, src/original/, and schemas/.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Build a single release instead of the full list.
    #[arg(long)]
    version: Option<String>,
    /// Refetch and rewrite even when outputs exist unchanged.
    #[arg(long)]
    force: bool,
}

fn init_logger(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Derive(args) => run_derive(args),
        Command::Diff(args) => run_diff(args),
        Command::Validate(args) => run_validate(args),
        Command::Build(args) => run_build(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let checkout = match &args.source {
        Some(path) => SourceCheckout::local(path),
        None => SourceCheckout::fetch(&args.version),
    }
    .map_err(|err| err.to_string())?;

    std::fs::create_dir_all(&args.out).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            args.out.display()
        )
    })?;
    generate_release(checkout.root(), &args.version, &args.out, args.force)
}

/// Mines and writes all four generated documents for one release.
fn generate_release(
    source_root: &Path,
    release: &str,
    out_dir: &Path,
    force: bool,
) -> Result<(), String> {
    for kind in ConfigKind::ALL {
        println!("\nProcessing {}...", kind.name());
        let Some(config) = mine_config(source_root, kind) else {
            println!("No parser table for {} in {release}; skipping.", kind.name());
            continue;
        };
        println!("{}", config.summary());

        let document = generate_document(&config, release);
        let out_path = out_dir.join(format!("{}.{release}.schema.json", kind.file_stem()));
        if force {
            let _ = std::fs::remove_file(&out_path);
        }
        write_document_if_changed(&out_path, &document).map_err(|err| err.to_string())?;

        // The site renderer wants the man page next to the snapshot.
        let man_src = source_root.join(kind.man_page());
        match Path::new(kind.man_page()).file_name() {
            Some(file_name) if man_src.exists() => {
                let man_dst = out_dir.join(file_name);
                std::fs::copy(&man_src, &man_dst)
                    .map_err(|err| format!("Failed to copy {}: {err}", man_src.display()))?;
            }
            _ => eprintln!("Warning: man page not found: {}", man_src.display()),
        }
    }
    Ok(())
}

fn run_derive(args: DeriveArgs) -> Result<(), String> {
    let curated_base = load_document(&args.curated_base).map_err(|err| err.to_string())?;
    let generated_base = load_document(&args.generated_base).map_err(|err| err.to_string())?;
    let generated_target = load_document(&args.generated_target).map_err(|err| err.to_string())?;

    let document = derive_release(
        &curated_base,
        &generated_base,
        &generated_target,
        &DeriveOptions {
            release: &args.release,
            base_release: &args.base_release,
            id_url: &args.id_url,
        },
    )
    .map_err(|err| err.to_string())?;

    write_document_if_changed(&args.out, &document).map_err(|err| err.to_string())?;
    Ok(())
}

fn run_diff(args: DiffArgs) -> Result<(), String> {
    let base = load_document(&args.base).map_err(|err| err.to_string())?;
    let target = load_document(&args.target).map_err(|err| err.to_string())?;

    let delta = diff(&base, &target);
    let rendered =
        serde_json::to_string_pretty(&delta).map_err(|err| format!("JSON error: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0usize;
    for path in &args.inputs {
        println!("Validating {}...", path.display());
        let document = match load_document(path) {
            Ok(document) => document,
            Err(err) => {
                println!("FAILED: {err}");
                failures += 1;
                continue;
            }
        };
        let issues = validate_document(&document);
        if issues.is_empty() {
            println!("OK");
        } else {
            println!("FAILED: {}", path.display());
            for issue in &issues {
                println!("  - {issue}");
            }
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(format!("{failures} document(s) failed validation"));
    }
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let layout = StoreLayout::new(&args.root);
    let releases: Vec<&str> = match &args.version {
        Some(version) => {
            if !RELEASES.contains(&version.as_str()) {
                return Err(format!(
                    "Release {version} not in supported list: {}",
                    RELEASES.join(", ")
                ));
            }
            vec![version.as_str()]
        }
        None => RELEASES.to_vec(),
    };

    let mut failed: Vec<&str> = Vec::new();

    // 1. Generated snapshots. A release that cannot be fetched is reported
    // and skipped; its siblings still build.
    for &release in &releases {
        let have_all = ConfigKind::ALL
            .iter()
            .all(|kind| layout.generated_document(release, *kind).exists());
        if have_all && !args.force {
            println!("Raw schemas for {release} already exist.");
            continue;
        }

        println!("Generating raw schemas for {release}...");
        let out_dir = layout.generated_dir(release);
        let outcome = SourceCheckout::fetch(release)
            .map_err(|err| err.to_string())
            .and_then(|checkout| {
                std::fs::create_dir_all(&out_dir).map_err(|err| err.to_string())?;
                generate_release(checkout.root(), release, &out_dir, args.force)
            });
        if let Err(err) = outcome {
            eprintln!("error: release {release}: {err}");
            failed.push(release);
        }
    }

    // 2. Curated lineage, then validation of what was written.
    for &release in &releases {
        if failed.contains(&release) {
            continue;
        }
        println!("Deriving curated schemas for {release}...");
        if let Err(err) = derive_published(&layout, release) {
            eprintln!("error: release {release}: {err}");
            failed.push(release);
        }
    }

    if failed.is_empty() {
        println!("\nBuild Complete!");
        Ok(())
    } else {
        Err(format!("failed releases: {}", failed.join(", ")))
    }
}

/// Writes the published curated documents for one release and validates
/// them.
fn derive_published(layout: &StoreLayout, release: &str) -> Result<(), String> {
    for kind in ConfigKind::ALL {
        let out_path = layout.published_document(release, kind);
        let id_url = layout.canonical_id(release, kind);

        if release == BASE_RELEASE {
            // The base release is published as-is, with its canonical $id.
            let curated_path = layout.curated_document(BASE_RELEASE, kind);
            let mut document = load_document(&curated_path).map_err(|err| err.to_string())?;
            set_id(&mut document, &id_url);
            write_document_if_changed(&out_path, &document).map_err(|err| err.to_string())?;
        } else {
            let target_path = layout.generated_document(release, kind);
            if !target_path.exists() {
                // Config kind absent in this release (predates it).
                println!("No generated {} snapshot for {release}; skipping.", kind.name());
                continue;
            }
            let curated_base = load_document(&layout.curated_document(BASE_RELEASE, kind))
                .map_err(|err| err.to_string())?;
            let generated_base = load_document(&layout.generated_document(BASE_RELEASE, kind))
                .map_err(|err| err.to_string())?;
            let generated_target = load_document(&target_path).map_err(|err| err.to_string())?;

            let document = derive_release(
                &curated_base,
                &generated_base,
                &generated_target,
                &DeriveOptions {
                    release,
                    base_release: BASE_RELEASE,
                    id_url: &id_url,
                },
            )
            .map_err(|err| err.to_string())?;
            write_document_if_changed(&out_path, &document).map_err(|err| err.to_string())?;
        }

        println!("Validating {}...", out_path.display());
        let issues = validate_document(&load_document(&out_path).map_err(|err| err.to_string())?);
        if !issues.is_empty() {
            let rendered: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            return Err(format!(
                "{} failed validation: {}",
                out_path.display(),
                rendered.join("; ")
            ));
        }
    }
    Ok(())
}
