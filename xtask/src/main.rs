//! Workspace maintenance tasks for the mlinalg crates.
//!
//! Usage: `cargo xtask <command>`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Maintenance tasks for the mlinalg workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc build
    Ci,
    /// Build rustdoc for every crate and write a landing page listing them
    Doc {
        /// Open the landing page afterwards
        #[arg(long)]
        open: bool,
    },
    /// Run the criterion benchmarks
    Bench {
        /// Restrict to one crate, e.g. `mlinalg-blas`
        #[arg(long, short)]
        package: Option<String>,
        /// Benchmark name filter passed through to criterion
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root()?;

    match cli.command {
        Commands::Ci => cmd_ci(&root),
        Commands::Doc { open } => cmd_doc(&root, open),
        Commands::Bench { package, filter } => cmd_bench(&root, package, filter),
    }
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

fn cargo(root: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to spawn cargo {}", args.join(" ")))?;
    if !status.success() {
        bail!("cargo {} exited with {status}", args.join(" "));
    }
    Ok(())
}

fn cmd_ci(root: &Path) -> Result<()> {
    let steps: [(&str, &[&str]); 4] = [
        ("fmt", &["fmt", "--all", "--", "--check"]),
        ("clippy", &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]),
        ("test", &["test", "--workspace"]),
        ("doc", &["doc", "--workspace", "--no-deps"]),
    ];
    for (name, args) in steps {
        println!("==> {name}");
        cargo(root, args)?;
    }
    println!("all checks passed");
    Ok(())
}

fn cmd_bench(root: &Path, package: Option<String>, filter: Option<String>) -> Result<()> {
    let mut args = vec!["bench".to_string()];
    match package {
        Some(p) => args.extend(["-p".to_string(), p]),
        None => args.push("--workspace".to_string()),
    }
    if let Some(f) = filter {
        args.extend(["--".to_string(), f]);
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    cargo(root, &args)
}

fn cmd_doc(root: &Path, open: bool) -> Result<()> {
    println!("==> cargo doc");
    cargo(root, &["doc", "--workspace", "--no-deps"])?;

    let crates = collect_crates(&root.join("crates"))?;
    let index = root.join("target/doc/index.html");
    fs::write(&index, render_index(&crates))
        .with_context(|| format!("failed to write {}", index.display()))?;
    println!("wrote {}", index.display());

    if open {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        // best effort; the page is already on disk
        let _ = Command::new(opener).arg(&index).status();
    }
    Ok(())
}

struct CrateEntry {
    name: String,
    description: String,
}

fn collect_crates(crates_dir: &Path) -> Result<Vec<CrateEntry>> {
    let mut crates = Vec::new();
    for entry in fs::read_dir(crates_dir)
        .with_context(|| format!("failed to read {}", crates_dir.display()))?
    {
        let manifest = entry?.path().join("Cargo.toml");
        if !manifest.exists() {
            continue;
        }
        let text = fs::read_to_string(&manifest)?;
        let value: toml::Value = text
            .parse()
            .with_context(|| format!("invalid manifest {}", manifest.display()))?;
        let package = value.get("package");
        let field = |key: &str| {
            package
                .and_then(|p| p.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let name = field("name");
        if !name.is_empty() {
            crates.push(CrateEntry {
                name,
                description: field("description"),
            });
        }
    }
    crates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(crates)
}

fn render_index(crates: &[CrateEntry]) -> String {
    let items: String = crates
        .iter()
        .map(|c| {
            format!(
                "    <li><a href=\"{}/index.html\">{}</a> - {}</li>\n",
                c.name.replace('-', "_"),
                c.name,
                c.description
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>mlinalg documentation</title>
  <style>
    body {{ font-family: sans-serif; max-width: 760px; margin: 2rem auto; line-height: 1.6; }}
    li {{ margin: 0.4rem 0; }}
  </style>
</head>
<body>
  <h1>mlinalg</h1>
  <p>Dense complex BLAS and LAPACK kernels for a matrix interpreter.</p>
  <ul>
{items}  </ul>
</body>
</html>
"#
    )
}
