use std::path::Path;

use tstf_core::{BARREL_EXTENSIONS, make_relative, to_slash};

/// Module path used in `from` clauses: relative to the output directory,
/// without extension, with a trailing `/index` collapsed to its directory.
pub(crate) fn module_path_from(out_dir: &Path, file: &Path) -> String {
    let rel = match make_relative(file, out_dir) {
        Some(rel) => to_slash(&rel),
        None => to_slash(file),
    };
    let rel = strip_script_extension(&rel);
    let rel = if rel.starts_with("../") || rel.starts_with('/') {
        rel.to_string()
    } else {
        format!("./{}", rel)
    };
    match rel.strip_suffix("/index") {
        Some(dir) => dir.to_string(),
        None => rel,
    }
}

/// Name given to a file's `default` export: the directory name for
/// `index.*` files, otherwise the file stem.
pub(crate) fn default_export_name(file: &Path) -> String {
    let file_name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let stem = strip_script_extension(file_name);
    let name = if stem == "index" && stem.len() < file_name.len() {
        file.parent()
            .and_then(|d| d.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(stem)
    } else {
        stem
    };
    to_identifier(name)
}

/// Qualified aliases for an overloaded name, most preferred first.
///
/// The first candidate prefixes the name with the last path segment that
/// does not merely repeat it. Each following candidate takes one more
/// segment from the left (`utilsFormat`, `aUtilsFormat`, `srcAUtilsFormat`).
/// A path with no usable segment yields the bare name.
pub(crate) fn qualified_candidates(from: &str, name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut segments: Vec<&str> = from
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect();
    while segments.last().is_some_and(|last| last.to_lowercase() == lower) {
        segments.pop();
    }
    if segments.is_empty() {
        return vec![name.to_string()];
    }

    (1..=segments.len())
        .map(|taken| {
            let prefix = segments[segments.len() - taken..].join("-");
            format!("{}{}", to_identifier(&prefix), capitalize_first(name))
        })
        .collect()
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// camelCase a path segment into a usable identifier (`date-picker` → `datePicker`).
pub(crate) fn to_identifier(segment: &str) -> String {
    let mut ident = String::with_capacity(segment.len());
    for (i, part) in segment
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|p| !p.is_empty())
        .enumerate()
    {
        if i == 0 {
            ident.push_str(part);
        } else {
            ident.push_str(&capitalize_first(part));
        }
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn strip_script_extension(path: &str) -> &str {
    for ext in BARREL_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext)
            && let Some(stripped) = stripped.strip_suffix('.')
        {
            return stripped;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_from() {
        let out = Path::new("/p/src");
        assert_eq!(module_path_from(out, Path::new("/p/src/a.ts")), "./a");
        assert_eq!(module_path_from(out, Path::new("/p/src/widgets/button.tsx")), "./widgets/button");
        assert_eq!(module_path_from(out, Path::new("/p/src/widgets/index.ts")), "./widgets");
        assert_eq!(module_path_from(out, Path::new("/p/src/index.ts")), ".");
        assert_eq!(module_path_from(out, Path::new("/p/lib/x.js")), "../lib/x");
        assert_eq!(module_path_from(out, Path::new("/p/src/types.d.ts")), "./types.d");
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_name(Path::new("/p/src/widgets/index.ts")), "widgets");
        assert_eq!(default_export_name(Path::new("/p/src/widgets/button.ts")), "button");
        assert_eq!(default_export_name(Path::new("/p/src/widgets/index.jsx")), "widgets");
        assert_eq!(default_export_name(Path::new("/p/src/date-picker.tsx")), "datePicker");
        assert_eq!(default_export_name(Path::new("/p/src/indexer.ts")), "indexer");
    }

    #[test]
    fn test_qualified_candidates() {
        assert_eq!(qualified_candidates("./a", "foo"), vec!["aFoo"]);
        assert_eq!(qualified_candidates("./b", "foo"), vec!["bFoo"]);
        // Segments repeating the symbol name are skipped
        assert_eq!(qualified_candidates("./widgets/button", "Button"), vec!["widgetsButton"]);
        assert_eq!(qualified_candidates("./button", "button"), vec!["button"]);
        assert_eq!(
            qualified_candidates("../lib/date-picker", "format"),
            vec!["datePickerFormat", "libDatePickerFormat"]
        );
    }

    #[test]
    fn test_qualified_candidates_widen_to_the_left() {
        assert_eq!(
            qualified_candidates("./a/utils", "format"),
            vec!["utilsFormat", "aUtilsFormat"]
        );
        assert_eq!(
            qualified_candidates("./src/a/utils/format", "format"),
            vec!["utilsFormat", "aUtilsFormat", "srcAUtilsFormat"]
        );
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("foo"), "Foo");
        assert_eq!(capitalize_first("Foo"), "Foo");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("widgets"), "widgets");
        assert_eq!(to_identifier("date-picker"), "datePicker");
        assert_eq!(to_identifier("v2.api"), "v2Api");
        assert_eq!(to_identifier("3d"), "_3d");
    }
}
