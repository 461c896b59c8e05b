//! `modgate modules`: print the module registry and unit assignments.

use crate::input;
use crate::output::{resolve_color_choice, StyledOutput};
use modgate_checker::{Checker, Location, ProgramInput};
use std::path::Path;

pub fn execute(program: &Path) -> anyhow::Result<()> {
    let loaded = input::load(program)?;
    let outcome = Checker::default().run(&loaded.input);
    let mut out = StyledOutput::new(resolve_color_choice(None));

    out.bold(&format!("Modules ({})", outcome.registry.len()));
    out.newline();
    for (_, decl) in outcome.registry.iter() {
        out.plain("  ");
        out.info(&decl.name);
        out.plain(&format!("  {}", position(&loaded.input, decl.location)));
        out.newline();
    }

    out.newline();
    out.bold(&format!("Units ({})", outcome.units.len()));
    out.newline();
    for unit in &outcome.units {
        let module = outcome
            .registry
            .describe(unit.module)
            .unwrap_or_else(|| "(no module)".to_string());
        out.plain(&format!("  {} -> ", unit.name));
        out.info(&module);
        out.newline();
    }

    out.flush();
    Ok(())
}

fn position(input: &ProgramInput, location: Location) -> String {
    let file = input
        .units
        .get(location.file.0)
        .map_or("<unknown>", |unit| unit.name.as_str());
    format!("{}:{}:{}", file, location.span.line, location.span.column)
}
