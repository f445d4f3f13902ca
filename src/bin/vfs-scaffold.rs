//! vfs-scaffold CLI Binary
//!
//! Populates, copies and inspects host directory trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use vfs_scaffold::logging::init_logging;
use vfs_scaffold::{DirFS, Report, ScaffoldConfig, Scaffolder, TracingSink, TreeContents};

#[derive(Parser, Debug)]
#[command(name = "vfs-scaffold", version, about = "Populate, copy and inspect file trees")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe every entry below DIR
    Inspect {
        dir: PathBuf,
        /// Also print file contents
        #[arg(long)]
        contents: bool,
    },
    /// Copy every file of SRC into DEST
    Copy { src: PathBuf, dest: PathBuf },
    /// Create the files listed in a JSON manifest of path -> content under DEST
    Populate { dest: PathBuf, manifest: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let config = match ScaffoldConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    match run(&cli.command, &config) {
        Ok(report) => {
            info!("command completed");
            println!("{report}");
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(command: &Command, config: &ScaffoldConfig) -> anyhow::Result<Report> {
    let scaffolder = Scaffolder::from_config(config);

    let report = match command {
        Command::Inspect { dir, contents } => {
            let fs = DirFS::new(existing_dir(dir)?)?;
            scaffolder
                .with_contents(config.include_contents || *contents)
                .inspect(&fs, &mut TracingSink)?
        }
        Command::Copy { src, dest } => {
            let src = DirFS::new(existing_dir(src)?)?;
            let mut dest = DirFS::new(std::path::absolute(dest)?)?;
            scaffolder.copy_tree(&src, &mut dest)?
        }
        Command::Populate { dest, manifest } => {
            let contents = read_manifest(manifest)?;
            let mut dest = DirFS::new(std::path::absolute(dest)?)?;
            scaffolder.populate(&mut dest, &contents)?
        }
    };
    Ok(report)
}

fn existing_dir(path: &Path) -> anyhow::Result<PathBuf> {
    let path = std::path::absolute(path)?;
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    Ok(path)
}

fn read_manifest(path: &Path) -> anyhow::Result<TreeContents> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|(path, content)| (path, content.into_bytes()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write_manifest(dir: &Path, json: &str) -> anyhow::Result<PathBuf> {
        let path = dir.join("manifest.json");
        std::fs::write(&path, json)?;
        Ok(path)
    }

    #[test]
    fn populate_from_manifest() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("cli_test")?;
        let manifest = write_manifest(
            temp_dir.path(),
            r#"{"file.txt": "file1", "dir1/file.txt": "file2", "dir1/dir2/file.txt": "file3"}"#,
        )?;
        let dest = temp_dir.path().join("out");

        let command = Command::Populate {
            dest: dest.clone(),
            manifest,
        };
        let report = run(&command, &ScaffoldConfig::default())?;

        assert_eq!(report.to_string(), "[POPULATE] dirs=2 files=3 bytes=15");
        assert_eq!(std::fs::read_to_string(dest.join("dir1/dir2/file.txt"))?, "file3");
        assert_eq!(std::fs::read_to_string(dest.join("file.txt"))?, "file1");
        Ok(())
    }

    #[test]
    fn copy_between_host_directories() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("cli_test")?;
        let src = temp_dir.path().join("src");
        std::fs::create_dir_all(src.join("a/b"))?;
        std::fs::write(src.join("a/b/c.txt"), "abc")?;
        let dest = temp_dir.path().join("dest");

        let command = Command::Copy {
            src,
            dest: dest.clone(),
        };
        let report = run(&command, &ScaffoldConfig::default())?;

        assert_eq!(report.files, 1);
        assert_eq!(std::fs::read_to_string(dest.join("a/b/c.txt"))?, "abc");
        Ok(())
    }

    #[test]
    fn inspect_counts_entries() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("cli_test")?;
        std::fs::create_dir(temp_dir.path().join("docs"))?;
        std::fs::write(temp_dir.path().join("docs/readme.md"), "# title")?;

        let command = Command::Inspect {
            dir: temp_dir.path().to_path_buf(),
            contents: true,
        };
        let report = run(&command, &ScaffoldConfig::default())?;
        assert_eq!(report.to_string(), "[INSPECT] dirs=1 files=1 bytes=7");
        Ok(())
    }

    #[test]
    fn inspect_of_missing_directory_fails() {
        let command = Command::Inspect {
            dir: PathBuf::from("/nonexistent/vfs-scaffold"),
            contents: false,
        };
        let err = run(&command, &ScaffoldConfig::default()).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn malformed_manifest_is_rejected() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("cli_test")?;
        let manifest = write_manifest(temp_dir.path(), r#"{"a.txt": 1}"#)?;
        let err = read_manifest(&manifest).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse manifest"));
        assert!(read_manifest(&temp_dir.path().join("missing.json")).is_err());
        Ok(())
    }
}
