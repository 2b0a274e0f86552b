//! Ordered element attributes.
//!
//! [§ 4.9.2 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
//!
//! "A NamedNodeMap has an associated attribute list." Order is the order the
//! attributes appeared in the source, and names are unique within the list.

/// A single name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute from anything string-like.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Insertion-ordered attribute list with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|attr| attr.name == name)
    }

    /// Append `attr` unless the name is already present. Returns whether it
    /// was added; the first value for a name always wins.
    pub fn insert_if_absent(&mut self, attr: Attribute) -> bool {
        if self.contains(&attr.name) {
            return false;
        }
        self.entries.push(attr);
        true
    }

    /// Set `name` to `value`, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Attribute { name, value }),
        }
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|attr| attr.name == name)?;
        Some(self.entries.remove(index).value)
    }

    /// Iterate in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for attr in iter {
            let _ = attrs.insert_if_absent(attr);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_duplicate_wins() {
        let attrs: Attributes = [
            Attribute::new("id", "a"),
            Attribute::new("class", "x"),
            Attribute::new("id", "b"),
        ]
        .into_iter()
        .collect();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("id"), Some("a"));
    }

    #[test]
    fn test_order_is_source_order() {
        let mut attrs = Attributes::new();
        attrs.set("z", "1");
        attrs.set("a", "2");
        attrs.set("z", "3");

        let names: Vec<_> = attrs.iter().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, ["z", "a"]);
        assert_eq!(attrs.get("z"), Some("3"));
    }

    #[test]
    fn test_remove() {
        let mut attrs = Attributes::new();
        attrs.set("href", "/");
        assert_eq!(attrs.remove("href"), Some("/".to_string()));
        assert!(attrs.is_empty());
        assert_eq!(attrs.remove("href"), None);
    }
}
