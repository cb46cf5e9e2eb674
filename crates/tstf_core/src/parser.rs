use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Declaration, ExportDefaultDeclarationKind, ImportDeclarationSpecifier, ModuleExportName,
    Program, Statement, TSModuleDeclarationName,
};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::TstfError,
    types::{
        DeclSpace, ExportEntry, ImportBinding, Imported, LocalDecl, ModuleInfo, SpecifierSite,
    },
};

/// Parse `file` into an owned [`ModuleInfo`], caching the result per path.
pub fn module_info_for(
    file: &Path,
    cache: &DashMap<PathBuf, Arc<ModuleInfo>>,
) -> Result<Arc<ModuleInfo>> {
    if let Some(v) = cache.get(file) {
        trace!("Cache hit for module info: {}", file.display());
        return Ok(Arc::clone(&v));
    }
    trace!("Parsing file for exports: {}", file.display());
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let info = Arc::new(parse_module_info(file, &src)?);
    debug!(
        "Found {} export entries and {} local declarations in {}",
        info.exports.len(),
        info.locals.len(),
        file.display()
    );
    cache.insert(file.to_path_buf(), Arc::clone(&info));
    Ok(info)
}

pub fn parse_module_info(file: &Path, src: &str) -> Result<ModuleInfo> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, file, src)?;

    let mut info = ModuleInfo::default();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                let source = decl.source.value.to_string();
                let Some(specifiers) = &decl.specifiers else {
                    continue;
                };
                for spec in specifiers {
                    let (local, imported) = match spec {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => (
                            s.local.name.to_string(),
                            Imported::Name(module_export_name(&s.imported)),
                        ),
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            (s.local.name.to_string(), Imported::Name("default".to_string()))
                        }
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            (s.local.name.to_string(), Imported::Namespace)
                        }
                    };
                    trace!("Found import binding '{}' from '{}'", local, source);
                    info.imports.insert(local, ImportBinding { source: source.clone(), imported });
                }
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    for local in declared_names(declaration) {
                        info.exports.push(ExportEntry::Local {
                            exported: local.name.clone(),
                            local: local.name.clone(),
                        });
                        info.locals.push(local);
                    }
                }
                for spec in &decl.specifiers {
                    let local = module_export_name(&spec.local);
                    let exported = module_export_name(&spec.exported);
                    let entry = match &decl.source {
                        Some(source) => ExportEntry::Reexport {
                            exported,
                            source: source.value.to_string(),
                            imported: Imported::Name(local),
                        },
                        None => ExportEntry::Local { exported, local },
                    };
                    info.exports.push(entry);
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                let named = match &decl.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
                        f.id.as_ref().map(|id| (id.name.to_string(), DeclSpace::Value))
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(c) => {
                        c.id.as_ref().map(|id| (id.name.to_string(), DeclSpace::Value))
                    }
                    ExportDefaultDeclarationKind::TSInterfaceDeclaration(i) => {
                        Some((i.id.name.to_string(), DeclSpace::Type))
                    }
                    _ => None,
                };
                let local = match named {
                    Some((name, space)) => {
                        info.locals.push(LocalDecl { name: name.clone(), space });
                        Some(name)
                    }
                    None => match &decl.declaration {
                        ExportDefaultDeclarationKind::Identifier(ident) => {
                            Some(ident.name.to_string())
                        }
                        _ => None,
                    },
                };
                info.exports.push(ExportEntry::Default { local });
            }
            Statement::ExportAllDeclaration(decl) => {
                let source = decl.source.value.to_string();
                let entry = match &decl.exported {
                    Some(name) => ExportEntry::Reexport {
                        exported: module_export_name(name),
                        source,
                        imported: Imported::Namespace,
                    },
                    None => ExportEntry::Star { source },
                };
                info.exports.push(entry);
            }
            _ => {
                // Non-exported declarations can still be exported later via `export { a }`
                if let Some(declaration) = stmt.as_declaration() {
                    info.locals.extend(declared_names(declaration));
                }
            }
        }
    }

    Ok(info)
}

/// Collect the module specifier literal of every import and export-from
/// statement, in source order.
pub fn specifier_sites(file: &Path, src: &str) -> Result<Vec<SpecifierSite>> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, file, src)?;

    let mut sites = Vec::new();
    for stmt in &program.body {
        let (statement, literal) = match stmt {
            Statement::ImportDeclaration(decl) => (decl.span, &decl.source),
            Statement::ExportNamedDeclaration(decl) => match &decl.source {
                Some(source) => (decl.span, source),
                None => continue,
            },
            Statement::ExportAllDeclaration(decl) => (decl.span, &decl.source),
            _ => continue,
        };
        trace!("Found module specifier '{}' in {}", literal.value, file.display());
        sites.push(SpecifierSite {
            value: literal.value.to_string(),
            literal: (literal.span.start as usize, literal.span.end as usize),
            statement: (statement.start as usize, statement.end as usize),
        });
    }
    Ok(sites)
}

fn parse_program<'a>(allocator: &'a Allocator, file: &Path, src: &'a str) -> Result<Program<'a>> {
    let st = source_type_for(file);
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(allocator, src, st).parse();

    if panicked || !errors.is_empty() {
        let message = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(TstfError::Parse { path: file.to_path_buf(), message }.into());
    }
    Ok(program)
}

fn declared_names(declaration: &Declaration) -> Vec<LocalDecl> {
    let value = |name: &str| LocalDecl { name: name.to_string(), space: DeclSpace::Value };
    let ty = |name: &str| LocalDecl { name: name.to_string(), space: DeclSpace::Type };

    match declaration {
        Declaration::VariableDeclaration(vd) => vd
            .declarations
            .iter()
            .flat_map(|d| d.id.get_binding_identifiers())
            .map(|id| value(id.name.as_str()))
            .collect(),
        Declaration::FunctionDeclaration(f) => {
            f.id.iter().map(|id| value(id.name.as_str())).collect()
        }
        Declaration::ClassDeclaration(c) => c.id.iter().map(|id| value(id.name.as_str())).collect(),
        Declaration::TSTypeAliasDeclaration(t) => vec![ty(t.id.name.as_str())],
        Declaration::TSInterfaceDeclaration(i) => vec![ty(i.id.name.as_str())],
        Declaration::TSEnumDeclaration(e) => vec![value(e.id.name.as_str())],
        Declaration::TSModuleDeclaration(m) => match &m.id {
            TSModuleDeclarationName::Identifier(id) => vec![value(id.name.as_str())],
            _ => vec![],
        },
        _ => vec![],
    }
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(sl) => sl.value.to_string(),
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());
    let is_definition =
        path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(".d."));

    SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")))
        .with_typescript_definition(is_definition)
        // Everything but explicit CommonJS files is parsed as an ES module
        .with_module(!matches!(ext, Some("cjs") | Some("cts")))
}
