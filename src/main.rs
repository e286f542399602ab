//! pypfmt CLI
//!
//! Entry point for the `pypfmt` command-line tool.

use clap::Parser;
use pypfmt::config::{self, MergedConfig};
use pypfmt::diff;
use pypfmt::pipeline::{Pipeline, PipelineResult};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

/// Environment variable that suppresses the configuration conflict
/// advisory.
const HIDE_CONFLICT_WARNING_ENV: &str = "PPF_HIDE_CONFLICT_WARNING";

const CONFLICT_WARNING: &str = "warning: [tool.tomlsort] and [tool.pypfmt] both present. \
toml-sort should not be used against pyproject.toml files when also using pypfmt, \
since results and ordering will be outside of pypfmt's control.";

#[derive(Parser)]
#[command(name = "pypfmt")]
#[command(about = "Sort and format pyproject.toml files", version)]
struct Cli {
    /// pyproject.toml files to format; reads stdin when omitted
    files: Vec<PathBuf>,

    /// Check if files are formatted, exit non-zero if not
    #[arg(long)]
    check: bool,

    /// Show unified diff of changes
    #[arg(long)]
    diff: bool,
}

fn main() {
    let cli = Cli::parse();

    let code = if cli.files.is_empty() {
        run_stdin(cli.check, cli.diff)
    } else {
        let mut code = 0;
        for path in &cli.files {
            code = code.max(process_file(path, cli.check, cli.diff));
        }
        code
    };
    process::exit(code);
}

/// Resolve the pipeline for one document, emitting the conflict advisory
/// when both configuration sections are present.
fn build_pipeline(text: &str) -> PipelineResult<Pipeline> {
    if config::has_conflicting_sections(text)
        && std::env::var_os(HIDE_CONFLICT_WARNING_ENV).is_none()
    {
        eprintln!("{CONFLICT_WARNING}");
    }
    let user = config::load_user_config(text)?;
    let merged = MergedConfig::resolve(user.as_ref())?;
    Ok(Pipeline::new(merged))
}

fn process_file(path: &Path, check: bool, show_diff: bool) -> i32 {
    let name = path.display().to_string();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("error: {name}: file not found");
            return 1;
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            eprintln!("error: {name}: permission denied");
            return 1;
        }
        Err(e) => {
            eprintln!("error: {name}: {e}");
            return 1;
        }
    };

    let result = match build_pipeline(&text).and_then(|pipeline| pipeline.process(&text)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {name}: {e}");
            return 1;
        }
    };

    if text == result {
        return 0;
    }

    if check && show_diff {
        print_diff(&text, &result, &name);
        return 1;
    }
    if check {
        eprintln!("error: {name}: not properly formatted");
        return 1;
    }
    if show_diff {
        print_diff(&text, &result, &name);
        return 0;
    }

    if let Err(e) = fs::write(path, &result) {
        eprintln!("error: {name}: {e}");
        return 1;
    }
    eprintln!("{name}: reformatted");
    0
}

fn run_stdin(check: bool, show_diff: bool) -> i32 {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("error: no input files provided");
        eprintln!("Usage: pypfmt [OPTIONS] [FILES]...");
        eprintln!("  or pipe input: cat pyproject.toml | pypfmt");
        return 2;
    }

    let mut text = String::new();
    if let Err(e) = stdin.read_to_string(&mut text) {
        eprintln!("error: stdin: {e}");
        return 1;
    }

    let result = match build_pipeline(&text).and_then(|pipeline| pipeline.process(&text)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: stdin: {e}");
            return 1;
        }
    };

    let clean = text == result;
    if check && show_diff {
        if !clean {
            print_diff(&text, &result, "stdin");
        }
        return i32::from(!clean);
    }
    if check {
        return i32::from(!clean);
    }
    if show_diff {
        if !clean {
            print_diff(&text, &result, "stdin");
        }
        return 0;
    }

    print!("{result}");
    0
}

fn print_diff(original: &str, formatted: &str, name: &str) {
    let color = io::stdout().is_terminal();
    print!("{}", diff::unified(original, formatted, name, color));
}
