// src/main.rs

use anyhow::{Context, Result};
use apkforge::{
    AssemblerConfig, CompressionFormat, LifecycleHook, Package, PackageAssembler, TarArchiver,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "apkforge")]
#[command(author, version, about = "Assemble Alpine APK packages from a staged tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an .apk from a staging directory
    Build {
        /// Package name
        #[arg(long)]
        name: String,
        /// Upstream version
        #[arg(long)]
        version: String,
        /// Release number, rendered as the -rN suffix
        #[arg(long, default_value_t = 0)]
        release: u32,
        /// Target architecture
        #[arg(long, default_value = "noarch")]
        arch: String,
        /// Install prefix
        #[arg(long, default_value = "/")]
        prefix: PathBuf,
        /// One-line package description
        #[arg(long)]
        description: Option<String>,
        /// Directory holding the files to package
        #[arg(long)]
        staging_dir: PathBuf,
        /// Output file, or an existing directory to use the default filename
        #[arg(short, long)]
        output: PathBuf,
        /// Lifecycle script source, as HOOK=PATH (repeatable)
        #[arg(long = "script", value_name = "HOOK=PATH")]
        scripts: Vec<String>,
        /// Compression for the final stream: none or gz
        #[arg(long, default_value = "none")]
        compress: String,
        /// On failure, copy the build directory here for inspection
        #[arg(long)]
        retain_build_dir: Option<PathBuf>,
    },
    /// Extract an existing .apk (not supported)
    Extract {
        /// Path to the package file
        package_path: PathBuf,
        /// Directory to extract into
        dest: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            name,
            version,
            release,
            arch,
            prefix,
            description,
            staging_dir,
            output,
            scripts,
            compress,
            retain_build_dir,
        } => {
            let compression = CompressionFormat::parse(&compress)
                .with_context(|| format!("unknown compression format: {}", compress))?;

            let mut package = Package::new(name, version, staging_dir);
            package.release = release;
            package.architecture = arch;
            package.prefix = prefix;
            package.description = description;

            for arg in &scripts {
                let (hook, path) = parse_script_arg(arg)?;
                let body = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read script {}", path.display()))?;
                package.scripts.insert(hook, body);
            }

            let output_path = if output.is_dir() {
                output.join(package.default_filename())
            } else {
                output
            };

            info!("building {} -> {}", package.name(), output_path.display());

            let mut assembler = PackageAssembler::new(TarArchiver::detect()?).with_config(
                AssemblerConfig {
                    compression,
                    retain_build_dir,
                },
            );
            let size = assembler.assemble(&mut package, &output_path)?;
            println!("Wrote {} ({} bytes)", output_path.display(), size);
            Ok(())
        }
        Commands::Extract { package_path, dest } => {
            let assembler = PackageAssembler::new(TarArchiver::default());
            assembler.extract(&package_path, &dest)?;
            Ok(())
        }
    }
}

/// Parse a `HOOK=PATH` script argument
fn parse_script_arg(arg: &str) -> Result<(LifecycleHook, PathBuf)> {
    let (hook, path) = arg
        .split_once('=')
        .with_context(|| format!("expected HOOK=PATH, got {}", arg))?;
    let hook = LifecycleHook::parse(hook)
        .with_context(|| format!("unknown lifecycle hook: {}", hook))?;
    Ok((hook, PathBuf::from(path)))
}
