use anyhow::{Context, Result, bail};
use clap::Parser;
use deadreq::workspace::{LoadOptions, Workspace};
use deadreq::{analyzer, cli, config, report};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

fn resolve_sln_path(arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    eprint!("Solution file path: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("read solution path from stdin")?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        bail!("no solution path given");
    }
    Ok(PathBuf::from(trimmed))
}

fn thread_count(arg: Option<usize>) -> usize {
    arg.or(config::Config::get().threads).unwrap_or_else(|| {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4)
    })
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            sln,
            format,
            threads,
            no_ignore,
        } => {
            let sln = resolve_sln_path(sln)?;
            let workspace = Workspace::load(&sln, LoadOptions::new(no_ignore))?;
            let resolver = analyzer::refs::IndexResolver;
            let options = analyzer::RunOptions {
                threads: thread_count(threads),
            };
            let outcome = analyzer::run(&workspace, &resolver, options);
            println!("{}", report::render_analysis(&outcome, format)?);
            eprintln!(
                "analysis complete in {}ms: {} candidates, {} flagged, {} failed",
                outcome.duration_ms,
                outcome.candidates,
                outcome.isolated.len(),
                outcome.failures.len()
            );
            Ok(())
        }
        cli::Command::Projects {
            sln,
            format,
            no_ignore,
        } => {
            let sln = resolve_sln_path(sln)?;
            let workspace = Workspace::load(&sln, LoadOptions::new(no_ignore))?;
            println!("{}", report::render_projects(&workspace, format)?);
            Ok(())
        }
        cli::Command::Candidates {
            sln,
            format,
            no_ignore,
        } => {
            let sln = resolve_sln_path(sln)?;
            let workspace = Workspace::load(&sln, LoadOptions::new(no_ignore))?;
            let (candidates, coverage) = analyzer::candidates::collect(&workspace);
            println!(
                "{}",
                report::render_candidates(&workspace, &candidates, &coverage, format)?
            );
            Ok(())
        }
    }
}
