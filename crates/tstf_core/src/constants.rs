//! File extension tables shared by parsing, resolution and collection.
//!
//! - **TypeScript**: `.ts`, `.tsx`, `.mts` (ES module), `.cts` (CommonJS)
//! - **JavaScript**: `.js`, `.jsx`, `.mjs` (ES module), `.cjs` (CommonJS)
//!
//! Barrel generation only considers the four "classic" extensions, matching
//! what a `from "./x"` specifier can omit.

/// File extensions for JavaScript/TypeScript files that can be parsed
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// Extensions collected by default for barrel generation, and stripped from
/// generated `from` paths
pub const BARREL_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Extensions to try when resolving module imports (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Index file names to try when resolving directory imports
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.mts",
    "index.cts",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

/// Directories never walked when enumerating project files
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_probed_file_is_parseable() {
        for ext in RESOLVE_EXTENSIONS.iter().chain(BARREL_EXTENSIONS) {
            assert!(JS_TS_EXTENSIONS.contains(ext), "'{}' cannot be parsed", ext);
        }
        for index in INDEX_FILES {
            let ext = index.strip_prefix("index.").unwrap();
            assert!(RESOLVE_EXTENSIONS.contains(&ext), "'{}' is never probed", index);
        }
    }

    #[test]
    fn test_typescript_sources_win_over_emitted_javascript() {
        let pos = |ext: &str| RESOLVE_EXTENSIONS.iter().position(|e| *e == ext).unwrap();
        assert!(pos("ts") < pos("js"));
        assert!(pos("tsx") < pos("jsx"));
        assert_eq!(INDEX_FILES[0], "index.ts");
    }
}
