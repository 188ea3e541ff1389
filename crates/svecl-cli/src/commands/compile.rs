//! `svecl compile`: compile component files through the registered load hooks.

use crate::output::{Severity, StyledOutput};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use svecl_plugin::{LoadArgs, PluginBuild};

pub struct CompileArgs {
    pub files: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    /// Number of files compiled at once, normally the compiler pool capacity
    pub workers: usize,
}

/// Compile every file on a bounded set of workers, then report in input
/// order.
///
/// Returns the number of files that failed.
pub fn execute(
    build: &PluginBuild,
    args: &CompileArgs,
    out: &mut StyledOutput,
) -> anyhow::Result<usize> {
    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Unable to create output directory {}", dir.display()))?;
    }

    let results = run_bounded(&args.files, args.workers, |file| build.load(&LoadArgs::new(file)));

    let mut failures = 0;
    for (file, result) in args.files.iter().zip(results) {
        let output = match result {
            Ok(Some(output)) => output,
            Ok(None) => {
                failures += 1;
                out.stderr_error(&format!("No loader handles {}", file.display()));
                continue;
            }
            Err(e) => {
                failures += 1;
                out.stderr_error(&e.to_string());
                continue;
            }
        };

        for warning in &output.warnings {
            out.diagnostic(Severity::Warning, warning);
        }
        for error in &output.errors {
            out.diagnostic(Severity::Error, error);
        }

        match (&output.contents, output.errors.is_empty()) {
            (Some(code), true) => emit(file, code, args, out)?,
            _ => failures += 1,
        }
    }

    out.flush();
    Ok(failures)
}

fn emit(
    file: &Path,
    code: &str,
    args: &CompileArgs,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    match &args.out_dir {
        Some(dir) => {
            let target = output_path(dir, file);
            std::fs::write(&target, code)
                .with_context(|| format!("Unable to write {}", target.display()))?;
            out.success("Compiled");
            out.plain(&format!(" {} -> {}", file.display(), target.display()));
            out.newline();
        }
        None => {
            if args.files.len() > 1 {
                out.dim(&format!("// {}", file.display()));
                out.newline();
            }
            out.plain(code);
        }
    }
    Ok(())
}

/// Apply `job` to every item using at most `workers` threads. Workers take
/// the next unclaimed item until none are left; results come back in item
/// order.
fn run_bounded<T, R, F>(items: &[T], workers: usize, job: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let next = AtomicUsize::new(0);
    let workers = workers.clamp(1, items.len().max(1));

    let mut done: Vec<(usize, R)> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(|| {
                    let mut finished = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(index) else {
                            break;
                        };
                        finished.push((index, job(item)));
                    }
                    finished
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    done.sort_by_key(|(index, _)| *index);
    done.into_iter().map(|(_, result)| result).collect()
}

/// `<out_dir>/<file stem>.js`
fn output_path(dir: &Path, file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or(file.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".js");
    dir.join(name)
}
