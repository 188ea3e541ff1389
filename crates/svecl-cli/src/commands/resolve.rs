//! `svecl resolve`: resolve specifiers through the registered resolve hooks.

use crate::output::StyledOutput;
use svecl_plugin::{PluginBuild, Resolution, ResolveArgs};

/// Print one line per specifier. Returns the number of failures.
pub fn execute(
    build: &PluginBuild,
    specifiers: &[String],
    out: &mut StyledOutput,
) -> anyhow::Result<usize> {
    let mut failures = 0;

    for specifier in specifiers {
        match build.resolve(&ResolveArgs::new(specifier.as_str())) {
            Ok(Resolution::Resolved { path, .. }) => {
                out.info(specifier);
                out.plain(" -> ");
                out.plain(&path.display().to_string());
                out.newline();
            }
            Ok(Resolution::PassThrough) => {
                out.info(specifier);
                out.plain(" -> ");
                out.dim("(native)");
                out.newline();
            }
            Err(e) => {
                failures += 1;
                out.stderr_error(&e.to_string());
            }
        }
    }

    out.flush();
    Ok(failures)
}
