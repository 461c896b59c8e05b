//! `modgate check`: run the visibility checker over a program file.

use crate::input;
use crate::output::{resolve_color_choice, StyledOutput};
use anyhow::Context;
use clap::ValueEnum;
use modgate_checker::{Checker, Diagnostic, JsonDiagnostic};
use std::path::Path;

/// Diagnostic output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Rendered with source snippets on stderr
    #[default]
    Pretty,
    /// JSON array on stdout
    Json,
}

/// Returns the number of diagnostics produced.
pub fn execute(
    program: &Path,
    config: Option<&Path>,
    format: Format,
    color: Option<&str>,
) -> anyhow::Result<usize> {
    let loaded = input::load(program)?;
    let config = super::load_config(program, config)?;
    let outcome = Checker::new(config).run(&loaded.input);

    let diagnostics: Vec<Diagnostic> = outcome.errors.iter().map(Diagnostic::from_error).collect();

    match format {
        Format::Json => {
            let json: Vec<JsonDiagnostic> = diagnostics
                .iter()
                .map(|diag| JsonDiagnostic::from_diagnostic(diag, &loaded.files))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Format::Pretty => {
            let mut out = StyledOutput::new(resolve_color_choice(color));
            for diag in &diagnostics {
                diag.emit(out.stderr(), &loaded.files)
                    .context("Failed to render diagnostic")?;
            }

            if diagnostics.is_empty() {
                out.success("ok");
                out.plain(&format!(
                    ": {} units, {} modules, no visibility errors",
                    outcome.units.len(),
                    outcome.registry.len()
                ));
                out.newline();
            } else {
                let plural = if diagnostics.len() == 1 { "" } else { "s" };
                out.stderr_error(&format!(
                    "found {} visibility error{}",
                    diagnostics.len(),
                    plural
                ));
            }
            out.flush();
        }
    }

    Ok(diagnostics.len())
}
