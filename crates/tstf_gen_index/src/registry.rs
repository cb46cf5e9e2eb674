//! Name/identity bookkeeping for barrel generation.
//!
//! Two tables reference each other through small integer ids:
//! - per name: which declarations it is bound to, and from which origin
//! - per declaration: which names it was exported under, and from where
//!
//! Any name that ends up bound to two declarations from different origins is
//! overloaded for the rest of the run, and every clause using it is emitted
//! qualified. Qualified aliases are chosen at render time so that they never
//! clash with each other or with a plain export.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use tstf_core::{DeclId, QuoteStyle};

use crate::naming::qualified_candidates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NameId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OriginId(u32);

/// Outcome of registering one `(name, declaration, origin)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Registration {
    /// First time this name is seen
    Fresh,
    /// First time this name is seen, but the declaration is already
    /// exported under other names
    AlsoExportedAs(Vec<String>),
    /// Same declaration already bound to this name; nothing emitted
    Duplicate { first_from: String },
    /// A second declaration under this name from the same file (type + value)
    SameFile,
    /// A different declaration under this name from another file
    Conflict { previous: Vec<String> },
}

#[derive(Debug, Clone)]
struct Clause {
    /// Name in the source module (`default` for default exports)
    exported: String,
    name: NameId,
}

#[derive(Debug)]
struct Origin {
    from: String,
    clauses: Vec<Clause>,
}

#[derive(Debug, Default)]
pub(crate) struct ExportRegistry {
    names: Vec<String>,
    name_ids: HashMap<String, NameId>,
    /// Indexed by `NameId`
    name_bindings: Vec<Vec<(DeclId, OriginId)>>,
    decl_names: HashMap<DeclId, Vec<(NameId, OriginId)>>,
    overloaded: HashSet<NameId>,
    origins: Vec<Origin>,
    origin_ids: HashMap<String, OriginId>,
}

impl ExportRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `decl`, exported from `from` as `exported` and published as `name`.
    pub(crate) fn register(
        &mut self,
        name: &str,
        exported: &str,
        decl: DeclId,
        from: &str,
    ) -> Registration {
        let Some(&name_id) = self.name_ids.get(name) else {
            let name_id = self.intern_name(name);
            let origin = self.origin_id(from);
            self.name_bindings[name_id.0 as usize].push((decl, origin));

            let earlier = self.decl_names.entry(decl).or_default();
            let also: Vec<NameId> = earlier.iter().map(|(n, _)| *n).collect();
            earlier.push((name_id, origin));

            self.add_clause(origin, exported, name_id);
            if also.is_empty() {
                return Registration::Fresh;
            }
            return Registration::AlsoExportedAs(
                also.into_iter().map(|n| self.names[n.0 as usize].clone()).collect(),
            );
        };

        let bindings = &self.name_bindings[name_id.0 as usize];
        if let Some((_, origin)) = bindings.iter().find(|(d, _)| *d == decl) {
            return Registration::Duplicate { first_from: self.origins[origin.0 as usize].from.clone() };
        }

        let same_file = self
            .origin_ids
            .get(from)
            .is_some_and(|current| bindings.iter().any(|(_, o)| o == current));
        let previous: Vec<String> = bindings
            .iter()
            .map(|(_, o)| self.origins[o.0 as usize].from.clone())
            .collect();

        let origin = self.origin_id(from);
        self.name_bindings[name_id.0 as usize].push((decl, origin));
        self.decl_names.entry(decl).or_default().push((name_id, origin));
        self.add_clause(origin, exported, name_id);

        if same_file {
            Registration::SameFile
        } else {
            self.overloaded.insert(name_id);
            Registration::Conflict { previous: dedup_in_order(previous) }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_overloaded(&self, name: &str) -> bool {
        self.name_ids.get(name).is_some_and(|id| self.overloaded.contains(id))
    }

    /// One `export { … } from …;` line per origin, in registration order.
    pub(crate) fn render(&self, quote: QuoteStyle) -> Vec<String> {
        let aliases = self.qualified_aliases();
        self.origins
            .iter()
            .enumerate()
            .filter(|(_, origin)| !origin.clauses.is_empty())
            .map(|(idx, origin)| {
                let origin_id = OriginId(idx as u32);
                let mut clauses: Vec<String> = origin
                    .clauses
                    .iter()
                    .map(|c| self.render_clause(c, aliases.get(&(origin_id, c.name))))
                    .collect();
                clauses.sort();
                clauses.dedup();
                format!("export {{ {} }} from {};", clauses.join(", "), quote.quote(&origin.from))
            })
            .collect()
    }

    fn render_clause(&self, clause: &Clause, alias: Option<&String>) -> String {
        let name = alias.unwrap_or(&self.names[clause.name.0 as usize]);
        if clause.exported == *name {
            name.clone()
        } else {
            format!("{} as {}", clause.exported, name)
        }
    }

    /// Pick one alias per `(origin, overloaded name)`.
    ///
    /// Every origin of a name starts at its first candidate. Origins whose
    /// candidate is shared or already taken move on to their next one until
    /// nothing changes. Whatever still clashes gets a numeric suffix.
    fn qualified_aliases(&self) -> HashMap<(OriginId, NameId), String> {
        let mut taken: HashSet<String> = self
            .name_ids
            .iter()
            .filter(|(_, id)| !self.overloaded.contains(id))
            .map(|(name, _)| name.clone())
            .collect();
        let mut overloaded: Vec<NameId> = self.overloaded.iter().copied().collect();
        overloaded.sort_by_key(|id| id.0);

        let mut aliases = HashMap::new();
        for name_id in overloaded {
            let name = &self.names[name_id.0 as usize];
            let mut origins: Vec<OriginId> = Vec::new();
            for (_, origin) in &self.name_bindings[name_id.0 as usize] {
                if !origins.contains(origin) {
                    origins.push(*origin);
                }
            }
            let candidates: Vec<Vec<String>> = origins
                .iter()
                .map(|o| qualified_candidates(&self.origins[o.0 as usize].from, name))
                .collect();

            let mut depth = vec![0; origins.len()];
            loop {
                let chosen: Vec<&str> =
                    candidates.iter().zip(&depth).map(|(c, d)| c[*d].as_str()).collect();
                let mut widened = false;
                for (i, alias) in chosen.iter().enumerate() {
                    let clashes =
                        taken.contains(*alias) || chosen.iter().filter(|c| *c == alias).count() > 1;
                    if clashes && depth[i] + 1 < candidates[i].len() {
                        depth[i] += 1;
                        widened = true;
                    }
                }
                if !widened {
                    break;
                }
            }

            for (i, origin) in origins.iter().enumerate() {
                let mut alias = candidates[i][depth[i]].clone();
                if taken.contains(&alias) {
                    let mut n = 2;
                    while taken.contains(&format!("{}{}", alias, n)) {
                        n += 1;
                    }
                    let numbered = format!("{}{}", alias, n);
                    warn!(
                        "'{}' from {} cannot be qualified from its path alone, using '{}'",
                        name, self.origins[origin.0 as usize].from, numbered
                    );
                    alias = numbered;
                }
                debug!(
                    "'{}' from {} is exported as '{}'",
                    name, self.origins[origin.0 as usize].from, alias
                );
                taken.insert(alias.clone());
                aliases.insert((*origin, name_id), alias);
            }
        }
        aliases
    }

    fn intern_name(&mut self, name: &str) -> NameId {
        let id = NameId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.name_bindings.push(Vec::new());
        self.name_ids.insert(name.to_string(), id);
        id
    }

    fn origin_id(&mut self, from: &str) -> OriginId {
        if let Some(id) = self.origin_ids.get(from) {
            return *id;
        }
        let id = OriginId(self.origins.len() as u32);
        self.origins.push(Origin { from: from.to_string(), clauses: Vec::new() });
        self.origin_ids.insert(from.to_string(), id);
        id
    }

    fn add_clause(&mut self, origin: OriginId, exported: &str, name: NameId) {
        self.origins[origin.0 as usize]
            .clauses
            .push(Clause { exported: exported.to_string(), name });
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tstf_core::{DeclKey, DeclOrigin, DeclSpace, DeclTable};

    fn decls(n: usize) -> Vec<DeclId> {
        let mut table = DeclTable::default();
        (0..n)
            .map(|i| {
                table.intern(DeclKey {
                    origin: DeclOrigin::Package(format!("pkg{}", i)),
                    name: "x".to_string(),
                    space: DeclSpace::Value,
                })
            })
            .collect()
    }

    #[test]
    fn test_fresh_and_duplicate() {
        let d = decls(1);
        let mut reg = ExportRegistry::new();

        assert_eq!(reg.register("foo", "foo", d[0], "."), Registration::Fresh);
        assert_eq!(
            reg.register("foo", "foo", d[0], "./foo"),
            Registration::Duplicate { first_from: ".".to_string() }
        );
        assert_eq!(reg.render(QuoteStyle::Double), vec!["export { foo } from \".\";"]);
    }

    #[test]
    fn test_same_declaration_under_two_names() {
        let d = decls(1);
        let mut reg = ExportRegistry::new();

        reg.register("foo", "foo", d[0], "./a");
        assert_eq!(
            reg.register("bar", "bar", d[0], "./b"),
            Registration::AlsoExportedAs(vec!["foo".to_string()])
        );
        assert_eq!(
            reg.render(QuoteStyle::Single),
            vec!["export { foo } from './a';", "export { bar } from './b';"]
        );
    }

    #[test]
    fn test_same_file_type_and_value() {
        let d = decls(2);
        let mut reg = ExportRegistry::new();

        reg.register("Foo", "Foo", d[0], "./a");
        assert_eq!(reg.register("Foo", "Foo", d[1], "./a"), Registration::SameFile);
        assert!(!reg.is_overloaded("Foo"));
        assert_eq!(reg.render(QuoteStyle::Double), vec!["export { Foo } from \"./a\";"]);
    }

    #[test]
    fn test_conflict_qualifies_every_occurrence() {
        let d = decls(3);
        let mut reg = ExportRegistry::new();

        reg.register("foo", "foo", d[0], "./a");
        reg.register("bar", "bar", d[2], "./a");
        assert_eq!(
            reg.register("foo", "foo", d[1], "./b"),
            Registration::Conflict { previous: vec!["./a".to_string()] }
        );
        assert!(reg.is_overloaded("foo"));
        assert_eq!(
            reg.render(QuoteStyle::Double),
            vec!["export { bar, foo as aFoo } from \"./a\";", "export { foo as bFoo } from \"./b\";"]
        );
    }

    #[test]
    fn test_overloaded_default_export() {
        let d = decls(2);
        let mut reg = ExportRegistry::new();

        reg.register("button", "default", d[0], "./button");
        reg.register("button", "default", d[1], "./widgets/button");
        assert_eq!(
            reg.render(QuoteStyle::Double),
            vec![
                "export { default as button } from \"./button\";",
                "export { default as widgetsButton } from \"./widgets/button\";"
            ]
        );
    }

    #[test]
    fn test_same_file_names_widen_the_prefix() {
        let d = decls(2);
        let mut reg = ExportRegistry::new();

        reg.register("format", "format", d[0], "./a/utils");
        reg.register("format", "format", d[1], "./b/utils");
        assert_eq!(
            reg.render(QuoteStyle::Double),
            vec![
                "export { format as aUtilsFormat } from \"./a/utils\";",
                "export { format as bUtilsFormat } from \"./b/utils\";"
            ]
        );
    }

    #[test]
    fn test_qualified_alias_avoids_plain_export() {
        let d = decls(3);
        let mut reg = ExportRegistry::new();

        reg.register("aFoo", "aFoo", d[2], "./other");
        reg.register("foo", "foo", d[0], "./a");
        reg.register("foo", "foo", d[1], "./b");
        assert_eq!(
            reg.render(QuoteStyle::Double),
            vec![
                "export { aFoo } from \"./other\";",
                "export { foo as aFoo2 } from \"./a\";",
                "export { foo as bFoo } from \"./b\";"
            ]
        );
    }

    #[test]
    fn test_duplicate_clauses_are_merged() {
        let d = decls(2);
        let mut reg = ExportRegistry::new();

        reg.register("b", "b", d[0], "./x");
        reg.register("a", "a", d[1], "./x");
        reg.register("b", "b", d[1], "./x");
        assert_eq!(reg.render(QuoteStyle::Double), vec!["export { a, b } from \"./x\";"]);
    }
}
