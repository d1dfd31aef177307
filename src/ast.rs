//! SVG document tree

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Everything before the root element: XML declaration, DOCTYPE,
    /// comments, processing instructions and whitespace.
    pub prolog: Vec<Node>,
    /// The root element
    pub root: Element,
    /// Comments, processing instructions and whitespace after the root.
    pub epilog: Vec<Node>,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "svg:rect")
    pub name: QName,
    /// Attributes in document order. Names are unique.
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order, empty for `<rect/>`.
    pub children: Vec<Node>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (e.g., "svg", "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self::new(s),
        }
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    Comment(String),
    CData(String),
    /// A processing instruction, raw content between `<?` and `?>`
    ProcessingInstruction(String),
    /// The XML declaration, raw content between `<?` and `?>`
    Declaration(String),
    /// DOCTYPE content after `<!DOCTYPE `
    DocType(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an unprefixed attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.prefix.is_none() && a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an unprefixed attribute value, keeping its position if it exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.prefix.is_none() && a.name.local == name)
        {
            Some(attr) => attr.value = value.into(),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }
}

impl Document {
    /// Recursively visit all elements mutably, parents before children.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        fn visit(elem: &mut Element, f: &mut impl FnMut(&mut Element)) {
            f(elem);
            for child in elem.child_elements_mut() {
                visit(child, f);
            }
        }
        visit(&mut self.root, &mut f);
    }
}
