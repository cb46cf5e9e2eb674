use anyhow::Result;
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use log::{debug, trace};
use serde::Deserialize;
use std::{
    fs,
    iter::Peekable,
    path::{Path, PathBuf},
    str::Chars,
};

use crate::{
    constants::{JS_TS_EXTENSIONS, SKIPPED_DIRS},
    error::TstfError,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub base_url: Option<String>,
    /// Kept as a JSON map so that declaration order survives deserialisation
    pub paths: Option<serde_json::Map<String, serde_json::Value>>,
}

/// `compilerOptions.baseUrl` and `compilerOptions.paths`, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub base_url: String,
    pub paths: Vec<(String, Vec<String>)>,
}

impl TsConfig {
    pub fn load(path: &Path) -> Result<TsConfig> {
        debug!("Reading tsconfig at: {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|source| TstfError::ConfigRead { path: path.to_path_buf(), source })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<TsConfig> {
        let cleaned = strip_json_comments(content);
        let config = serde_json::from_str::<TsConfig>(&cleaned).map_err(|e| {
            TstfError::ConfigInvalid { path: path.to_path_buf(), message: e.to_string() }
        })?;
        Ok(config)
    }

    /// Extract the path mapping; both `baseUrl` and `paths` are required.
    pub fn path_mapping(&self, path: &Path) -> Result<PathMapping> {
        let missing = |field| TstfError::MissingCompilerOption { path: path.to_path_buf(), field };
        let options = self.compiler_options.as_ref().ok_or_else(|| missing("baseUrl"))?;
        let base_url = options.base_url.clone().ok_or_else(|| missing("baseUrl"))?;
        let paths_obj = options.paths.as_ref().ok_or_else(|| missing("paths"))?;

        let mut paths = Vec::with_capacity(paths_obj.len());
        for (alias, targets) in paths_obj {
            let targets = targets
                .as_array()
                .and_then(|arr| {
                    arr.iter().map(|t| t.as_str().map(str::to_string)).collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| TstfError::ConfigInvalid {
                    path: path.to_path_buf(),
                    message: format!("compilerOptions.paths['{}'] must be an array of strings", alias),
                })?;
            trace!("Found tsconfig path alias: '{}' -> {:?}", alias, targets);
            paths.push((alias.clone(), targets));
        }

        debug!("Loaded {} tsconfig path aliases", paths.len());
        Ok(PathMapping { base_url, paths })
    }

    /// Source files belonging to the project rooted at `config_dir`.
    ///
    /// Mirrors the compiler's defaults: `files` are always included,
    /// `include` defaults to `**/*`, and `node_modules` is never visited.
    pub fn project_files(&self, config_dir: &Path) -> Result<Vec<PathBuf>> {
        let include = match &self.include {
            Some(patterns) => compile_patterns(patterns)?,
            None if self.files.is_some() => Vec::new(),
            None => compile_patterns(&["**/*".to_string()])?,
        };
        let exclude = compile_patterns(self.exclude.as_deref().unwrap_or_default())?;
        let options = MatchOptions { require_literal_separator: true, ..MatchOptions::default() };

        let mut files: Vec<PathBuf> = Vec::new();
        for file in self.files.iter().flatten() {
            let p = config_dir.join(file);
            if p.is_file() {
                files.push(p);
            }
        }

        let walker = WalkBuilder::new(config_dir)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .filter_entry(|e| {
                e.file_name().to_str().is_none_or(|name| !SKIPPED_DIRS.contains(&name))
            })
            .build();

        for entry in walker {
            let entry = entry?;
            let p = entry.path();
            if !p.is_file() || !has_extension(p, JS_TS_EXTENSIONS) {
                continue;
            }
            let Ok(rel) = p.strip_prefix(config_dir) else {
                continue;
            };
            if !include.iter().any(|pat| pat.matches_path_with(rel, options)) {
                continue;
            }
            if exclude.iter().any(|pat| pat.matches_path_with(rel, options)) {
                trace!("Excluded by tsconfig: {}", rel.display());
                continue;
            }
            files.push(p.to_path_buf());
        }

        files.sort();
        files.dedup();
        debug!("Found {} project files under {}", files.len(), config_dir.display());
        Ok(files)
    }
}

/// A pattern without wildcards names a directory (or file) and everything below it.
fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    let mut compiled = Vec::new();
    for raw in patterns {
        let raw = raw.trim_start_matches("./").trim_end_matches('/');
        let mut variants = vec![raw.to_string()];
        if !raw.contains(['*', '?', '[']) {
            variants.push(format!("{}/**/*", raw));
        }
        for variant in variants {
            let pattern = Pattern::new(&variant).map_err(|e| TstfError::Glob {
                pattern: variant.clone(),
                message: e.to_string(),
            })?;
            compiled.push(pattern);
        }
    }
    Ok(compiled)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| extensions.contains(&ext))
}

/// Remove `//` and `/* */` comments and trailing commas outside of strings.
pub fn strip_json_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            (',', _) => {
                // Trailing comma: next significant character closes the container
                if !matches!(next_significant(chars.clone()), Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// First character after whitespace and comments, scanning only as far as it.
fn next_significant(mut chars: Peekable<Chars<'_>>) -> Option<char> {
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            (c, _) if c.is_whitespace() => {}
            ('/', Some('/')) => {
                chars.find(|&next| next == '\n');
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            (c, _) => return Some(c),
        }
    }
    None
}
