//! Latent ambiguity detection.
//!
//! Two methods of the same function conflict when some call accepted by
//! both has neither as the unique most specific choice. In a
//! single-inheritance hierarchy every such call lies below the
//! position-wise meet of the two signatures, and any method accepting the
//! meet also accepts that call, so dispatching the meet alone decides
//! whether the pair conflicts.

use std::io::{self, Write};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;
use tracing::{debug, trace};

use mdispatch::Resolution;

use crate::catalog::{Catalog, CatalogError};

/// A pair of methods left ambiguous by some call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub function: String,
    /// Method indices into [`Catalog::methods`], `first < second`.
    pub first: usize,
    pub second: usize,
    /// The most general ambiguous call.
    pub witness: Vec<String>,
}

/// Find every conflicting method pair in the catalog.
pub fn find_conflicts(catalog: &Catalog) -> Result<Vec<Conflict>, CatalogError> {
    let matcher = catalog.hierarchy.subtyping();
    let mut conflicts = Vec::new();

    for function in catalog.functions() {
        let table = catalog.table(function)?;
        let methods: Vec<_> = catalog.methods_of(function).collect();

        for (pos, &(first, a)) in methods.iter().enumerate() {
            for &(second, b) in &methods[pos + 1..] {
                if a.params.len() != b.params.len() {
                    continue;
                }
                let Some(witness) = catalog
                    .hierarchy
                    .meet_params(&[a.params.as_slice(), b.params.as_slice()])
                else {
                    trace!(function, first, second, "disjoint signatures");
                    continue;
                };

                if let Resolution::Ambiguous(maximal) = table.dispatch(witness.as_slice(), &matcher) {
                    let tied = |index: usize| maximal.iter().any(|imp| *imp.handler() == index);
                    if tied(first) && tied(second) {
                        debug!(function, first, second, ?witness, "found conflict");
                        conflicts.push(Conflict {
                            function: function.to_string(),
                            first,
                            second,
                            witness,
                        });
                    }
                }
            }
        }
    }

    Ok(conflicts)
}

impl Conflict {
    /// `function(T1, T2)` for the witness call.
    pub fn witness_display(&self) -> String {
        format!("{}({})", self.function, self.witness.join(", "))
    }

    /// Write an ariadne warning pointing at both methods.
    pub fn write_diagnostic<W: Write>(&self, catalog: &Catalog, color: bool, out: W) -> io::Result<()> {
        let origin = catalog.origin.as_str();
        let first = &catalog.methods[self.first];
        let second = &catalog.methods[self.second];

        Report::build(ReportKind::Warning, origin, second.name_span.start)
            .with_message(format!(
                "methods of `{}` are ambiguous for `{}`",
                self.function,
                self.witness_display()
            ))
            .with_label(
                Label::new((origin, first.params_span.clone()))
                    .with_color(Color::Yellow)
                    .with_message(format!("{} accepts it", first.describe())),
            )
            .with_label(
                Label::new((origin, second.params_span.clone()))
                    .with_color(Color::Yellow)
                    .with_message(format!("and so does {}", second.describe())),
            )
            .with_help(format!(
                "define `{}` or make one signature more specific",
                self.witness_display()
            ))
            .with_config(Config::default().with_color(color))
            .finish()
            .write((origin, Source::from(catalog.source.as_str())), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(methods: &str) -> Catalog {
        let types = r#"
[[type]]
name = "Number"

[[type]]
name = "Int"
parent = "Number"

[[type]]
name = "Text"
"#;
        Catalog::parse("check.toml", format!("{types}{methods}")).unwrap()
    }

    const DIAGONAL: &str = r#"
[[method]]
name = "add"
params = ["Int", "Number"]

[[method]]
name = "add"
params = ["Number", "Int"]
"#;

    #[test]
    fn test_diagonal_conflict() {
        let c = catalog(DIAGONAL);
        let conflicts = find_conflicts(&c).unwrap();
        assert_eq!(
            conflicts,
            vec![Conflict {
                function: "add".to_string(),
                first: 0,
                second: 1,
                witness: vec!["Int".to_string(), "Int".to_string()],
            }]
        );
        assert_eq!(conflicts[0].witness_display(), "add(Int, Int)");
    }

    #[test]
    fn test_tie_breaker_resolves_conflict() {
        let methods = format!("{DIAGONAL}\n[[method]]\nname = \"add\"\nparams = [\"Int\", \"Int\"]\n");
        let c = catalog(&methods);
        assert!(find_conflicts(&c).unwrap().is_empty());
    }

    #[test]
    fn test_chain_has_no_conflict() {
        let c = catalog(
            r#"
[[method]]
name = "show"
params = ["Any"]

[[method]]
name = "show"
params = ["Number"]

[[method]]
name = "show"
params = ["Int"]

[[method]]
name = "show"
params = ["Text"]
"#,
        );
        assert!(find_conflicts(&c).unwrap().is_empty());
    }

    #[test]
    fn test_disjoint_and_mismatched_arity_ignored() {
        let c = catalog(
            r#"
[[method]]
name = "f"
params = ["Int", "Text"]

[[method]]
name = "f"
params = ["Text", "Int"]

[[method]]
name = "f"
params = ["Int"]
"#,
        );
        assert!(find_conflicts(&c).unwrap().is_empty());
    }

    #[test]
    fn test_lexicographic_has_no_conflict() {
        let c = catalog(&format!("[config]\nlifting = \"lexicographic\"\n{DIAGONAL}"));
        assert_eq!(c.config.lifting, mdispatch::LiftingRule::Lexicographic);
        assert!(find_conflicts(&c).unwrap().is_empty());
    }

    #[test]
    fn test_diagnostic() {
        let c = catalog(DIAGONAL);
        let conflict = &find_conflicts(&c).unwrap()[0];
        let mut out = Vec::new();
        conflict.write_diagnostic(&c, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("methods of `add` are ambiguous for `add(Int, Int)`"));
        assert!(text.contains("add(Int, Number) accepts it"));
        assert!(text.contains("and so does add(Number, Int)"));
    }
}
