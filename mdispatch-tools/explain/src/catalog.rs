//! Method table files.
//!
//! A table file declares a type hierarchy and the methods of one or more
//! generic functions:
//!
//! ```toml
//! [config]
//! lifting = "pareto"
//!
//! [[type]]
//! name = "Ship"
//!
//! [[type]]
//! name = "Asteroid"
//!
//! [[method]]
//! name = "collide"
//! params = ["Asteroid", "Any"]
//! label = "asteroid hits anything"
//! ```
//!
//! Methods sharing a `name` are the implementations of one function.

use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use indexmap::IndexSet;
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;
use tracing::debug;

use mdispatch::{DispatchConfig, MethodTable, Signature, TableError};

use crate::hierarchy::{HierarchyError, Subtyping, TypeHierarchy};

/// Errors raised while loading or querying a table file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("unknown type `{ty}` in {context}")]
    UnknownType {
        ty: String,
        context: String,
        span: Option<Range<usize>>,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("no function named `{0}`")]
    UnknownFunction(String),
}

impl CatalogError {
    /// Source span the error points at, if it has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            CatalogError::Toml(err) => err.span(),
            CatalogError::UnknownType { span, .. } => span.clone(),
            _ => None,
        }
    }

    /// Write an ariadne report for an error raised while parsing `source`.
    ///
    /// Errors without a span get a bare report anchored at the start.
    pub fn write_diagnostic<W: Write>(
        &self,
        origin: &str,
        source: &str,
        color: bool,
        out: W,
    ) -> io::Result<()> {
        let span = self.span();
        let offset = span.as_ref().map_or(0, |s| s.start);
        let mut builder = Report::build(ReportKind::Error, origin, offset)
            .with_message(self.headline());
        if let Some(span) = span {
            builder = builder.with_label(
                Label::new((origin, span))
                    .with_color(Color::Red)
                    .with_message(self.label()),
            );
        }
        builder
            .with_config(Config::default().with_color(color))
            .finish()
            .write((origin, Source::from(source)), out)
    }

    fn headline(&self) -> String {
        match self {
            CatalogError::Toml(err) => format!("invalid table file: {}", err.message()),
            other => other.to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            CatalogError::UnknownType { ty, .. } => format!("`{}` is not declared", ty),
            _ => "here".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default)]
    config: DispatchConfig,
    #[serde(default, rename = "type")]
    types: Vec<TypeDecl>,
    #[serde(default, rename = "method")]
    methods: Vec<MethodDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeDecl {
    name: String,
    #[serde(default)]
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodDecl {
    name: Spanned<String>,
    params: Spanned<Vec<String>>,
    #[serde(default)]
    label: Option<String>,
}

/// One method definition from a table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// The generic function this method implements.
    pub function: String,
    pub params: Vec<String>,
    pub label: Option<String>,
    /// Span of the function name in the source.
    pub name_span: Range<usize>,
    /// Span of the parameter list in the source.
    pub params_span: Range<usize>,
}

impl MethodDef {
    pub fn signature(&self) -> Signature<String> {
        Signature::from(self.params.as_slice())
    }

    /// `function(T1, T2)`, followed by the label when there is one.
    pub fn describe(&self) -> String {
        let head = format!("{}{}", self.function, self.signature());
        match &self.label {
            Some(label) => format!("{} [{}]", head, label),
            None => head,
        }
    }
}

/// Method table used for dispatch; handlers are indices into
/// [`Catalog::methods`].
pub type FunctionTable<'c> = MethodTable<String, usize, Subtyping<'c>>;

/// A loaded, validated table file.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Name shown in diagnostics, usually the file path.
    pub origin: String,
    pub source: String,
    pub config: DispatchConfig,
    pub hierarchy: TypeHierarchy,
    pub methods: Vec<MethodDef>,
}

impl Catalog {
    /// Read and validate a table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path.display().to_string(), source)
    }

    /// Parse and validate table file source.
    pub fn parse(origin: impl Into<String>, source: String) -> Result<Self, CatalogError> {
        let file: TableFile = toml::from_str(&source)?;

        let hierarchy = TypeHierarchy::from_decls(
            file.types
                .iter()
                .map(|t| (t.name.as_str(), t.parent.as_deref())),
        )?;

        let mut methods = Vec::with_capacity(file.methods.len());
        for decl in file.methods {
            let function = decl.name.get_ref().clone();
            let params_span = decl.params.span();
            for ty in decl.params.get_ref() {
                if !hierarchy.contains(ty) {
                    return Err(CatalogError::UnknownType {
                        ty: ty.clone(),
                        context: format!("parameters of `{}`", function),
                        span: Some(params_span.clone()),
                    });
                }
            }
            methods.push(MethodDef {
                name_span: decl.name.span(),
                function,
                params: decl.params.into_inner(),
                label: decl.label,
                params_span,
            });
        }

        let catalog = Self {
            origin: origin.into(),
            source,
            config: file.config,
            hierarchy,
            methods,
        };

        // Building each table once surfaces duplicate signatures at load time.
        for function in catalog.functions() {
            catalog.table(function)?;
        }

        debug!(
            types = catalog.hierarchy.len(),
            methods = catalog.methods.len(),
            "loaded method table"
        );
        Ok(catalog)
    }

    /// Function names in order of first definition.
    pub fn functions(&self) -> Vec<&str> {
        self.methods
            .iter()
            .map(|m| m.function.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Methods of `function` with their indices into [`Catalog::methods`].
    pub fn methods_of<'c>(
        &'c self,
        function: &'c str,
    ) -> impl Iterator<Item = (usize, &'c MethodDef)> + 'c {
        self.methods
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.function == function)
    }

    /// Build the dispatch table for `function`.
    pub fn table(&self, function: &str) -> Result<FunctionTable<'_>, CatalogError> {
        let mut table = MethodTable::with_config(
            function,
            self.hierarchy.subtyping(),
            self.config.clone(),
        );
        for (index, method) in self.methods_of(function) {
            table.define(method.signature(), index)?;
        }
        if table.is_empty() {
            return Err(CatalogError::UnknownFunction(function.to_string()));
        }
        Ok(table)
    }

    /// Check that every call argument names a known type.
    pub fn check_call(&self, call: &[String]) -> Result<(), CatalogError> {
        match call.iter().find(|ty| !self.hierarchy.contains(ty)) {
            Some(ty) => Err(CatalogError::UnknownType {
                ty: ty.clone(),
                context: "call arguments".to_string(),
                span: None,
            }),
            None => Ok(()),
        }
    }

    /// 1-based line of a byte offset in the source.
    pub fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.source.len());
        self.source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }
}
