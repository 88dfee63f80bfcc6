//! `dusk transform` - rewrite stylesheets with dark-mode variables.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use notify::{RecursiveMode, Watcher};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{DuskError, Result};
use crate::output::{display_path, plural, Printer};
use crate::transform::transform;

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Stylesheets or directories to scan for .css files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for rewritten stylesheets
    #[arg(short, long, default_value = "dist")]
    pub output: PathBuf,

    /// Rewrite files in place instead of writing to the output directory
    #[arg(short, long)]
    pub write: bool,

    /// Print rewritten CSS to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Re-run the transform when inputs change
    #[arg(long)]
    pub watch: bool,
}

pub fn run(args: TransformArgs) -> Result<()> {
    let printer = Printer::new();
    let config = super::load_config(args.config.as_deref())?;

    process_all(&args, &config, &printer)?;

    if args.watch {
        watch(&args, &config, &printer)?;
    }
    Ok(())
}

fn process_all(args: &TransformArgs, config: &Config, printer: &Printer) -> Result<()> {
    let files = collect_css_files(&args.files);
    if files.is_empty() {
        printer.warning("Skipping", "no .css files found");
        return Ok(());
    }

    let mut written = 0;
    for file in &files {
        if process_file(file, args, config, printer)? {
            written += 1;
        }
    }
    if !args.stdout {
        printer.status(
            "Finished",
            &format!(
                "{} scanned, {} written",
                plural(files.len(), "stylesheet", "stylesheets"),
                written
            ),
        );
    }
    Ok(())
}

/// Transform one stylesheet. Returns whether a file was written; writes
/// are skipped when the target already holds the rewritten content, so
/// watch mode does not loop on its own output.
fn process_file(
    path: &Path,
    args: &TransformArgs,
    config: &Config,
    printer: &Printer,
) -> Result<bool> {
    let source = fs::read_to_string(path).map_err(|e| DuskError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rewritten = transform(&source, config);

    if args.stdout {
        print!("{rewritten}");
        return Ok(false);
    }

    let target = if args.write {
        path.to_path_buf()
    } else {
        fs::create_dir_all(&args.output)?;
        let name = path.file_name().ok_or_else(|| DuskError::Io {
            path: path.to_path_buf(),
            message: "not a file".to_string(),
        })?;
        args.output.join(name)
    };

    if let Ok(existing) = fs::read_to_string(&target) {
        if existing == rewritten {
            printer.status("Unchanged", &display_path(&target));
            return Ok(false);
        }
    }

    fs::write(&target, &rewritten).map_err(|e| DuskError::Io {
        path: target.clone(),
        message: e.to_string(),
    })?;
    printer.status("Wrote", &display_path(&target));
    Ok(true)
}

/// Block on filesystem events, re-running the transform on each change.
fn watch(args: &TransformArgs, config: &Config, printer: &Printer) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx).map_err(|e| DuskError::Watch {
        message: e.to_string(),
        help: None,
    })?;

    for path in &args.files {
        watcher
            .watch(path, RecursiveMode::Recursive)
            .map_err(|e| DuskError::Watch {
                message: format!("{}: {}", path.display(), e),
                help: Some("check that the path exists".to_string()),
            })?;
    }

    printer.status(
        "Watching",
        &plural(args.files.len(), "path for changes", "paths for changes"),
    );

    for event in rx {
        match event {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                if let Err(error) = process_all(args, config, printer) {
                    printer.error("Error", &error.to_string());
                }
            }
            Ok(_) => {}
            Err(error) => printer.warning("Watch", &error.to_string()),
        }
    }
    Ok(())
}

/// Expand the given paths into a sorted list of .css files, recursing
/// into directories.
fn collect_css_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && has_css_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn has_css_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("css"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args(files: Vec<PathBuf>, output: PathBuf) -> TransformArgs {
        TransformArgs {
            files,
            config: None,
            output,
            write: false,
            stdout: false,
            watch: false,
        }
    }

    #[test]
    fn test_collect_css_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("theme");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("all.css"), "p { color: #000; }").unwrap();
        fs::write(nested.join("admin.CSS"), "p { color: #000; }").unwrap();
        fs::write(dir.path().join("notes.txt"), "not css").unwrap();

        let files = collect_css_files(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| has_css_extension(f)));
    }

    #[test]
    fn test_process_file_writes_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("all.css");
        let out = dir.path().join("dist");
        fs::write(&input, "body { color: #000; }").unwrap();

        let args = default_args(vec![input.clone()], out.clone());
        let written =
            process_file(&input, &args, &Config::default(), &Printer::new()).unwrap();

        assert!(written);
        let result = fs::read_to_string(out.join("all.css")).unwrap();
        assert!(result.contains("color: var(--color-000);"));
        assert!(result.contains(":root[data-theme=\"dark\"]"));
        // input untouched
        assert_eq!(fs::read_to_string(&input).unwrap(), "body { color: #000; }");
    }

    #[test]
    fn test_process_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("all.css");
        fs::write(&input, "body { color: #000; }").unwrap();

        let mut args = default_args(vec![input.clone()], dir.path().join("dist"));
        args.write = true;
        process_file(&input, &args, &Config::default(), &Printer::new()).unwrap();

        let rewritten = fs::read_to_string(&input).unwrap();
        assert!(rewritten.contains("var(--color-000)"));

        // a second pass is a no-op over its own output
        let again = process_file(&input, &args, &Config::default(), &Printer::new()).unwrap();
        assert!(!again);
        assert_eq!(fs::read_to_string(&input).unwrap(), rewritten);
    }
}
