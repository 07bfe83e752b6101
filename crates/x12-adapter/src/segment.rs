//! Output segment model and serialization

use crate::syntax::Terminators;

/// A data element (simple or composite)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Simple element (single value)
    Simple(String),
    /// Composite element (multiple components)
    Composite(Vec<String>),
}

impl Element {
    /// Whether the element carries no data
    pub fn is_empty(&self) -> bool {
        match self {
            Element::Simple(value) => value.is_empty(),
            Element::Composite(components) => components.iter().all(String::is_empty),
        }
    }

    fn write_to(&self, out: &mut String, terminators: &Terminators) {
        match self {
            Element::Simple(value) => out.push_str(value),
            Element::Composite(components) => {
                let used = components
                    .iter()
                    .rposition(|c| !c.is_empty())
                    .map_or(0, |last| last + 1);
                for (i, component) in components[..used].iter().enumerate() {
                    if i > 0 {
                        out.push(terminators.subelement);
                    }
                    out.push_str(component);
                }
            }
        }
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Simple(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Simple(value.to_string())
    }
}

/// A segment ready to be written: identifier plus ordered elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSegment {
    /// Segment identifier (e.g. "IK3")
    pub id: String,
    /// Data elements, element 1 first
    pub elements: Vec<Element>,
}

impl OutputSegment {
    /// Create an empty segment
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    /// Append a simple element
    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.elements.push(Element::Simple(value.into()));
        self
    }

    /// Append a composite element
    pub fn push_composite(&mut self, components: Vec<String>) -> &mut Self {
        self.elements.push(Element::Composite(components));
        self
    }

    /// Set the element at a 1-based position, padding with empty elements
    pub fn set(&mut self, position: usize, element: impl Into<Element>) -> &mut Self {
        let index = position.saturating_sub(1);
        if self.elements.len() <= index {
            self.elements
                .resize(index + 1, Element::Simple(String::new()));
        }
        self.elements[index] = element.into();
        self
    }

    /// Get the element at a 1-based position
    pub fn get(&self, position: usize) -> Option<&Element> {
        position
            .checked_sub(1)
            .and_then(|index| self.elements.get(index))
    }

    /// Get a simple element value at a 1-based position
    pub fn value(&self, position: usize) -> Option<&str> {
        match self.get(position) {
            Some(Element::Simple(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Serialize without the segment terminator
    ///
    /// Trailing empty elements are dropped; interior empty elements keep
    /// their separators.
    pub fn format(&self, terminators: &Terminators) -> String {
        let used = self
            .elements
            .iter()
            .rposition(|e| !e.is_empty())
            .map_or(0, |last| last + 1);

        let mut out = self.id.clone();
        for element in &self.elements[..used] {
            out.push(terminators.element);
            element.write_to(&mut out, terminators);
        }
        out
    }
}
