//! subgraph::compiler
//!
//! Compiles a projection into a GraphQL selection set.
//!
//! # Algorithm
//!
//! Starting at a root [`ObjectType`], the compiler walks the normalized
//! projection:
//!
//! 1. `id` is emitted first for every object.
//! 2. Scalars are emitted by name.
//! 3. Relations resolve their target type through the schema, take their
//!    page size from the [`Filters`] table (or the default), get an
//!    explicit newest-first ordering when they lead to events, and recurse
//!    with the target as the current type.
//!
//! Sibling order follows the projection. The whole [`SelectionSet`] is
//! built before any text is produced, so an unknown relation anywhere in
//! the tree means no output at all.
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::compiler::QueryCompiler;
//! use hatwork::subgraph::projection::ProjectionConfig;
//! use hatwork::subgraph::schema::ObjectType;
//!
//! let projection = ProjectionConfig::new()
//!     .field("prettyId")
//!     .relation("wearers", ProjectionConfig::new());
//!
//! let selection = QueryCompiler::new().compile(ObjectType::Hat, &projection).unwrap();
//! assert_eq!(selection.to_string(), "id, prettyId, wearers(first: 1000) { id }");
//! ```

use std::fmt;
use std::num::NonZeroU32;

use tracing::{debug, trace};

use super::filters::Filters;
use super::projection::{normalize, ProjectionConfig, ProjectionEntry};
use super::schema::{next_type, ObjectType, SchemaError};
use crate::core::constants::DEFAULT_PAGE_SIZE;

/// The identifier field every object carries.
pub const ID_FIELD: &str = "id";

/// A compiled selection set for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    pub fields: Vec<Field>,
}

/// One field in a [`SelectionSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Scalar(String),
    Relation {
        name: String,
        arguments: Vec<Argument>,
        selection: SelectionSet,
    },
}

/// A field argument such as `first: 1000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: &'static str,
    pub value: String,
}

impl Argument {
    fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl SelectionSet {
    /// Render on multiple lines, indenting nested sets by two spaces.
    ///
    /// The first line is not indented; nested lines are indented relative
    /// to `indent`.
    pub fn render_pretty(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        let pad = " ".repeat(indent);
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&pad);
            }
            match field {
                Field::Scalar(name) => out.push_str(name),
                Field::Relation {
                    name,
                    arguments,
                    selection,
                } => {
                    out.push_str(name);
                    write_arguments(out, arguments);
                    out.push_str(" {\n");
                    out.push_str(&" ".repeat(indent + 2));
                    selection.write_pretty(out, indent + 2);
                    out.push('\n');
                    out.push_str(&pad);
                    out.push('}');
                }
            }
        }
    }
}

fn write_arguments(out: &mut String, arguments: &[Argument]) {
    if arguments.is_empty() {
        return;
    }
    let rendered: Vec<String> = arguments.iter().map(Argument::to_string).collect();
    out.push('(');
    out.push_str(&rendered.join(", "));
    out.push(')');
}

/// Compact single-line rendering: siblings separated by `, `.
impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Scalar(name) => f.write_str(name),
            Field::Relation {
                name,
                arguments,
                selection,
            } => {
                let mut head = name.clone();
                write_arguments(&mut head, arguments);
                write!(f, "{head} {{ {selection} }}")
            }
        }
    }
}

/// Compiles projections against the relation schema.
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler<'a> {
    page_size: NonZeroU32,
    filters: Option<&'a Filters>,
}

impl Default for QueryCompiler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> QueryCompiler<'a> {
    /// A compiler with the default page size and no filters.
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            filters: None,
        }
    }

    /// Override the page size used when no filter applies.
    pub fn with_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Use `filters` for per-relation page sizes.
    pub fn with_filters(mut self, filters: &'a Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Normalize `projection` and compile it for `root`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if any nested relation is not
    /// defined for the type it appears on.
    pub fn compile(
        &self,
        root: ObjectType,
        projection: &ProjectionConfig,
    ) -> Result<SelectionSet, SchemaError> {
        debug!(root = %root, fields = projection.len(), "compiling projection");
        self.compile_entries(root, &normalize(projection))
    }

    /// Compile already-normalized entries for `current`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` as for [`compile`](Self::compile).
    pub fn compile_entries(
        &self,
        current: ObjectType,
        entries: &[ProjectionEntry],
    ) -> Result<SelectionSet, SchemaError> {
        let mut fields = Vec::with_capacity(entries.len() + 1);
        fields.push(Field::Scalar(ID_FIELD.to_string()));

        for entry in entries {
            match entry {
                // Already emitted first.
                ProjectionEntry::Scalar(name) if name == ID_FIELD => {}
                ProjectionEntry::Scalar(name) => fields.push(Field::Scalar(name.clone())),
                ProjectionEntry::Relation { name, entries } => {
                    let target = next_type(current, name)?;
                    let arguments = self.relation_arguments(current, name, target);
                    trace!(from = %current, relation = %name, to = %target, "resolved relation");
                    fields.push(Field::Relation {
                        name: name.clone(),
                        arguments,
                        selection: self.compile_entries(target, entries)?,
                    });
                }
            }
        }

        Ok(SelectionSet { fields })
    }

    fn relation_arguments(
        &self,
        current: ObjectType,
        relation: &str,
        target: ObjectType,
    ) -> Vec<Argument> {
        let first = self
            .filters
            .and_then(|filters| filters.page_size(current, relation))
            .unwrap_or(self.page_size.get());

        let mut arguments = vec![Argument::new("first", first)];
        if target.is_timestamped() {
            arguments.push(Argument::new("orderBy", "timestamp"));
            arguments.push(Argument::new("orderDirection", "desc"));
        }
        arguments
    }
}

/// Compile `projection` for `root` to compact text in one call.
///
/// # Errors
///
/// Returns `SchemaError::UnknownRelation` for relations the schema lacks.
pub fn compile_selection(
    root: ObjectType,
    projection: &ProjectionConfig,
    filters: Option<&Filters>,
) -> Result<String, SchemaError> {
    let mut compiler = QueryCompiler::new();
    if let Some(filters) = filters {
        compiler = compiler.with_filters(filters);
    }
    Ok(compiler.compile(root, projection)?.to_string())
}
