//! Explaining how a single call dispatches.

use std::fmt::Write as _;
use std::io::{self, Write};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;
use tracing::debug;

use mdispatch::Resolution;

use crate::catalog::{Catalog, CatalogError, MethodDef};

/// How a call resolved. Method indices refer to [`Catalog::methods`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(usize),
    NoMatch,
    Ambiguous(Vec<usize>),
}

/// The full story of one call: what applied and what was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub function: String,
    /// Run-time type of each argument.
    pub call: Vec<String>,
    /// Methods accepting the call, in definition order.
    pub applicable: Vec<usize>,
    pub outcome: Outcome,
}

/// Dispatch `function` over argument types `call`.
pub fn explain(catalog: &Catalog, function: &str, call: &[String]) -> Result<Explanation, CatalogError> {
    catalog.check_call(call)?;

    let table = catalog.table(function)?;
    let matcher = catalog.hierarchy.subtyping();

    let applicable = table
        .applicable(call, &matcher)
        .into_iter()
        .map(|imp| *imp.handler())
        .collect();

    let outcome = match table.dispatch(call, &matcher) {
        Resolution::Winner(imp) => Outcome::Selected(*imp.handler()),
        Resolution::NoMatch => Outcome::NoMatch,
        Resolution::Ambiguous(candidates) => {
            Outcome::Ambiguous(candidates.iter().map(|imp| *imp.handler()).collect())
        }
    };

    debug!(function, ?outcome, "explained call");
    Ok(Explanation {
        function: function.to_string(),
        call: call.to_vec(),
        applicable,
        outcome,
    })
}

#[derive(Serialize)]
struct MethodJson<'a> {
    index: usize,
    params: &'a [String],
    label: Option<&'a str>,
    line: usize,
}

#[derive(Serialize)]
struct ExplanationJson<'a> {
    function: &'a str,
    call: &'a [String],
    outcome: &'static str,
    selected: Vec<MethodJson<'a>>,
    applicable: Vec<MethodJson<'a>>,
}

impl Explanation {
    pub fn is_selected(&self) -> bool {
        matches!(self.outcome, Outcome::Selected(_))
    }

    /// The method that would run, if any.
    pub fn selected<'c>(&self, catalog: &'c Catalog) -> Option<&'c MethodDef> {
        match self.outcome {
            Outcome::Selected(index) => catalog.methods.get(index),
            _ => None,
        }
    }

    /// `function(T1, T2)` for the call itself.
    pub fn call_display(&self) -> String {
        format!("{}({})", self.function, self.call.join(", "))
    }

    /// Human-readable report.
    pub fn render_text(&self, catalog: &Catalog) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "call: {}", self.call_display());
        let _ = writeln!(out, "applicable ({}):", self.applicable.len());
        for &index in &self.applicable {
            let method = &catalog.methods[index];
            let _ = writeln!(
                out,
                "  {}  (line {})",
                method.describe(),
                catalog.line_of(method.name_span.start)
            );
        }

        match &self.outcome {
            Outcome::Selected(index) => {
                let _ = writeln!(out, "selected: {}", catalog.methods[*index].describe());
            }
            Outcome::NoMatch => {
                let _ = writeln!(out, "no applicable method");
            }
            Outcome::Ambiguous(indices) => {
                let _ = writeln!(out, "ambiguous between {} methods:", indices.len());
                for &index in indices {
                    let _ = writeln!(out, "  {}", catalog.methods[index].describe());
                }
            }
        }
        out
    }

    /// Machine-readable report.
    pub fn to_json(&self, catalog: &Catalog) -> serde_json::Result<serde_json::Value> {
        let method = |index: usize| {
            let def = &catalog.methods[index];
            MethodJson {
                index,
                params: &def.params,
                label: def.label.as_deref(),
                line: catalog.line_of(def.name_span.start),
            }
        };

        let (outcome, selected) = match &self.outcome {
            Outcome::Selected(index) => ("selected", vec![method(*index)]),
            Outcome::NoMatch => ("no-match", Vec::new()),
            Outcome::Ambiguous(indices) => {
                ("ambiguous", indices.iter().map(|&i| method(i)).collect())
            }
        };

        let report = ExplanationJson {
            function: &self.function,
            call: &self.call,
            outcome,
            selected,
            applicable: self.applicable.iter().map(|&i| method(i)).collect(),
        };
        serde_json::to_value(report)
    }

    /// The most general signature that would settle an ambiguous call:
    /// the position-wise meet of the tied methods.
    pub fn tie_breaker(&self, catalog: &Catalog) -> Option<Vec<String>> {
        let Outcome::Ambiguous(indices) = &self.outcome else {
            return None;
        };
        let lists: Vec<&[String]> = indices
            .iter()
            .map(|&i| catalog.methods[i].params.as_slice())
            .collect();
        catalog.hierarchy.meet_params(&lists)
    }

    /// Write an ariadne diagnostic for a call that did not resolve.
    ///
    /// Nothing is written when a method was selected.
    pub fn write_diagnostic<W: Write>(&self, catalog: &Catalog, color: bool, out: W) -> io::Result<()> {
        let origin = catalog.origin.as_str();
        let methods: Vec<(usize, &MethodDef)> = catalog.methods_of(&self.function).collect();
        let offset = methods.first().map_or(0, |(_, m)| m.name_span.start);

        let builder = match &self.outcome {
            Outcome::Selected(_) => return Ok(()),
            Outcome::NoMatch => {
                let mut builder = Report::build(ReportKind::Error, origin, offset)
                    .with_message(format!("no method of `{}` accepts this call", self.call_display()));
                for (_, method) in &methods {
                    let message = if method.params.len() != self.call.len() {
                        format!("takes {} arguments", method.params.len())
                    } else {
                        format!("expects ({})", method.params.join(", "))
                    };
                    builder = builder.with_label(
                        Label::new((origin, method.params_span.clone()))
                            .with_color(Color::Blue)
                            .with_message(message),
                    );
                }
                builder.with_help(format!(
                    "define a `{}` method whose parameters accept ({})",
                    self.function,
                    self.call.join(", ")
                ))
            }
            Outcome::Ambiguous(indices) => {
                let mut builder = Report::build(ReportKind::Error, origin, offset).with_message(
                    format!(
                        "ambiguous call `{}`: {} methods are equally specific",
                        self.call_display(),
                        indices.len()
                    ),
                );
                for &index in indices {
                    let method = &catalog.methods[index];
                    builder = builder.with_label(
                        Label::new((origin, method.params_span.clone()))
                            .with_color(Color::Red)
                            .with_message(format!("candidate {}", method.describe())),
                    );
                }
                match self.tie_breaker(catalog) {
                    Some(params) => builder.with_help(format!(
                        "define `{}({})` to break the tie",
                        self.function,
                        params.join(", ")
                    )),
                    None => builder,
                }
            }
        };

        builder
            .with_config(Config::default().with_color(color))
            .finish()
            .write((origin, Source::from(catalog.source.as_str())), out)
    }
}
