//! Generate OWNERS repository fixtures for benchmarking.
//!
//! Usage: cargo run --release --bin generate-fixtures --features generate -- [output_dir]
//!
//! Writes one directory tree per preset, using the same presets as the
//! core benchmarks. Point `owners-inventory --local` at a tree to time a run.

use owners_inventory_core::generate::{GeneratorConfig, generate_repository};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Type alias for fixture preset entries.
type PresetEntry = (&'static str, fn() -> GeneratorConfig);

/// Fixture presets - keep in sync with benches/fixtures.rs
const PRESETS: &[PresetEntry] = &[
    ("small", GeneratorConfig::small),
    ("medium", GeneratorConfig::medium),
    ("large", GeneratorConfig::large),
];

fn main() -> ExitCode {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("benches/fixtures"));

    if let Err(e) = run(&output_dir) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(output_dir: &Path) -> io::Result<()> {
    for (name, config_fn) in PRESETS {
        let root = output_dir.join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }

        let files = generate_repository(&config_fn());
        let mut bytes = 0;
        for (relative, content) in &files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            bytes += content.len();
        }

        println!(
            "Generated {} ({} OWNERS files, {} bytes)",
            root.display(),
            files.len(),
            bytes
        );
    }

    Ok(())
}
