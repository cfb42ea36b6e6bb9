//! Identified-object lists
//!
//! Four fixed categories, each rendered as escaped entries in service order or a
//! single placeholder when empty.

use serde::Serialize;

use super::request::ObjectCollection;
use crate::util::html::escape_html;

/// Fixed object categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectCategory {
    /// Tables
    Table,
    /// Columns
    Column,
    /// Functions
    Function,
    /// Aliases
    Alias,
}

impl ObjectCategory {
    /// All categories in display order
    pub const ALL: [ObjectCategory; 4] = [
        ObjectCategory::Table,
        ObjectCategory::Column,
        ObjectCategory::Function,
        ObjectCategory::Alias,
    ];

    /// Singular badge label
    pub fn label(&self) -> &'static str {
        match self {
            ObjectCategory::Table => "table",
            ObjectCategory::Column => "column",
            ObjectCategory::Function => "function",
            ObjectCategory::Alias => "alias",
        }
    }

    /// Plural display name
    pub fn plural(&self) -> &'static str {
        match self {
            ObjectCategory::Table => "tables",
            ObjectCategory::Column => "columns",
            ObjectCategory::Function => "functions",
            ObjectCategory::Alias => "aliases",
        }
    }

    /// Text of the empty-category placeholder
    pub fn empty_placeholder(&self) -> String {
        format!("No {} identified", self.plural())
    }

    fn index(&self) -> usize {
        match self {
            ObjectCategory::Table => 0,
            ObjectCategory::Column => 1,
            ObjectCategory::Function => 2,
            ObjectCategory::Alias => 3,
        }
    }

    fn items<'a>(&self, collection: &'a ObjectCollection) -> &'a [String] {
        match self {
            ObjectCategory::Table => &collection.tables,
            ObjectCategory::Column => &collection.columns,
            ObjectCategory::Function => &collection.functions,
            ObjectCategory::Alias => &collection.aliases,
        }
    }
}

/// One displayed list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectEntry {
    /// An identified object, escaped
    Item(String),
    /// Muted "nothing found" entry
    Placeholder(String),
}

impl ObjectEntry {
    /// Display text
    pub fn text(&self) -> &str {
        match self {
            ObjectEntry::Item(text) | ObjectEntry::Placeholder(text) => text,
        }
    }
}

/// Renders an [`ObjectCollection`] into the four category lists.
#[derive(Debug, Clone)]
pub struct ObjectListProjector {
    lists: [Vec<ObjectEntry>; 4],
}

impl Default for ObjectListProjector {
    fn default() -> Self {
        let mut projector = Self {
            lists: Default::default(),
        };
        projector.clear();
        projector
    }
}

impl ObjectListProjector {
    /// Create a projector showing placeholders in every category
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every list with the contents of `collection`
    pub fn project(&mut self, collection: &ObjectCollection) {
        for category in ObjectCategory::ALL {
            let items = category.items(collection);
            let entries = if items.is_empty() {
                vec![ObjectEntry::Placeholder(category.empty_placeholder())]
            } else {
                items
                    .iter()
                    .map(|item| ObjectEntry::Item(escape_html(item)))
                    .collect()
            };
            self.lists[category.index()] = entries;
        }
    }

    /// Project four empty categories
    pub fn clear(&mut self) {
        self.project(&ObjectCollection::default());
    }

    /// Entries currently shown for `category`
    pub fn entries(&self, category: ObjectCategory) -> &[ObjectEntry] {
        &self.lists[category.index()]
    }

    /// True when every category shows only its placeholder
    pub fn is_cleared(&self) -> bool {
        ObjectCategory::ALL.iter().all(|category| {
            matches!(self.entries(*category), [ObjectEntry::Placeholder(_)])
        })
    }
}
