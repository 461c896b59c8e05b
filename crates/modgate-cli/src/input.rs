//! Program description files
//!
//! A program file lists the compilation units of a run with their module
//! attribute, module declarations, symbol declarations and use-sites. Symbols
//! are referred to by exact qualified name and resolved here, before the
//! checker runs.

use anyhow::{bail, Context};
use modgate_checker::{
    Declaration, FileId, Location, ModuleAttr, ModuleDecl, ProgramInput, SimpleFiles, Span,
    SymbolId, SymbolKind, UnitId, UnitSource, UseKind, UseSite,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

/// Top level of a program file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramFile {
    /// Compilation units
    #[serde(default)]
    pub units: Vec<UnitEntry>,
}

/// One compilation unit
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitEntry {
    /// Unit path, used as its name in diagnostics
    pub path: String,
    /// Source text, enables snippets in diagnostics
    #[serde(default)]
    pub source: Option<String>,
    /// Module attribute of the unit
    #[serde(default)]
    pub module: Option<NamedAt>,
    /// Module declarations made in this unit
    #[serde(default)]
    pub modules: Vec<NamedAt>,
    /// Symbol declarations
    #[serde(default)]
    pub declarations: Vec<DeclEntry>,
    /// Use-sites
    #[serde(default)]
    pub uses: Vec<UseEntry>,
}

/// Position of something in a unit's source
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    /// 1-based line
    pub line: u32,
    /// 1-based column, counted in characters
    #[serde(default = "first_column")]
    pub column: u32,
    /// Length in bytes (defaults to the length of the name)
    #[serde(default)]
    pub len: Option<usize>,
}

fn first_column() -> u32 {
    1
}

/// A name with a position (module attribute or module declaration)
#[derive(Debug, Deserialize)]
pub struct NamedAt {
    /// Module name
    pub name: String,
    /// Where the name is written
    #[serde(flatten)]
    pub at: Position,
}

/// A symbol declaration
#[derive(Debug, Deserialize)]
pub struct DeclEntry {
    /// Symbol kind
    pub kind: SymbolKind,
    /// Qualified name, unique across the program
    pub name: String,
    /// `internal` marker
    #[serde(default)]
    pub internal: bool,
    /// Names of symbols in the signature
    #[serde(default)]
    pub signature: Vec<String>,
    /// Where the declaration's name is written
    #[serde(flatten)]
    pub at: Position,
}

/// A use of a symbol
#[derive(Debug, Deserialize)]
pub struct UseEntry {
    /// Qualified name of the target
    pub target: String,
    /// How the target is used
    pub kind: UseKind,
    /// Where the use is written
    #[serde(flatten)]
    pub at: Position,
}

/// A program ready for checking, with its files registered for rendering
pub struct LoadedProgram {
    /// Checker input
    pub input: ProgramInput,
    /// Source files, indexed by `FileId`
    pub files: SimpleFiles<String, String>,
}

/// Load a program file from disk
pub fn load(path: &Path) -> anyhow::Result<LoadedProgram> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid program file {}", path.display()))
}

/// Parse program file text
pub fn parse(text: &str) -> anyhow::Result<LoadedProgram> {
    let file: ProgramFile = toml::from_str(text)?;
    lower(file)
}

fn lower(file: ProgramFile) -> anyhow::Result<LoadedProgram> {
    let mut files = SimpleFiles::new();
    let mut names: FxHashMap<&str, (SymbolId, &str)> = FxHashMap::default();

    for (unit_index, unit) in file.units.iter().enumerate() {
        for (decl_index, decl) in unit.declarations.iter().enumerate() {
            let id = SymbolId::new(UnitId(unit_index as u32), decl_index as u32);
            if let Some((_, first)) = names.insert(decl.name.as_str(), (id, unit.path.as_str())) {
                bail!(
                    "symbol '{}' is declared in both {} and {}",
                    decl.name,
                    first,
                    unit.path
                );
            }
        }
    }

    let resolve = |name: &str, unit: &UnitEntry, line: u32| -> anyhow::Result<SymbolId> {
        match names.get(name) {
            Some((id, _)) => Ok(*id),
            None => bail!("{}:{}: no symbol named '{}'", unit.path, line, name),
        }
    };

    let mut input = ProgramInput::default();

    for (unit_index, unit) in file.units.iter().enumerate() {
        let source = unit.source.clone().unwrap_or_default();
        let file_id = FileId(files.add(unit.path.clone(), source.clone()));
        debug_assert_eq!(file_id.0, unit_index);

        for decl in &unit.modules {
            let location = locate(file_id, &source, decl.at, decl.name.len());
            input.modules.push(ModuleDecl::new(decl.name.clone(), location));
        }

        let mut lowered = UnitSource::new(unit.path.clone(), file_id);
        lowered.module = unit.module.as_ref().map(|attr| {
            let location = locate(file_id, &source, attr.at, attr.name.len());
            ModuleAttr::new(attr.name.clone(), location)
        });

        for decl in &unit.declarations {
            let mut declaration = Declaration::new(
                decl.kind,
                decl.name.clone(),
                locate(file_id, &source, decl.at, decl.name.len()),
            );
            declaration.internal = decl.internal;
            for name in &decl.signature {
                declaration.signature.push(resolve(name, unit, decl.at.line)?);
            }
            lowered.declarations.push(declaration);
        }

        for site in &unit.uses {
            let target = resolve(&site.target, unit, site.at.line)?;
            let location = locate(file_id, &source, site.at, site.target.len());
            lowered.uses.push(UseSite::new(target, site.kind, location));
        }

        input.units.push(lowered);
    }

    tracing::debug!(
        units = input.units.len(),
        modules = input.modules.len(),
        symbols = names.len(),
        "program file loaded"
    );

    Ok(LoadedProgram { input, files })
}

/// Turn a line/column position into a location, clamped to the source text
fn locate(file: FileId, source: &str, at: Position, default_len: usize) -> Location {
    let line = at.line.max(1);
    let column = at.column.max(1);

    let line_start = source
        .split_inclusive('\n')
        .take(line as usize - 1)
        .map(str::len)
        .sum::<usize>()
        .min(source.len());
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);

    let line_text = &source[line_start..line_end];
    let start = line_start
        + line_text
            .char_indices()
            .nth(column as usize - 1)
            .map_or(line_text.len(), |(offset, _)| offset);
    let end = (start + at.len.unwrap_or(default_len)).min(line_end);

    Location::new(file, Span::new(start, end, line, column))
}
