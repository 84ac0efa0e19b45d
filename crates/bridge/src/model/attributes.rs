use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Key of the [`ConnectionInfo`](crate::attributes::ConnectionInfo) attribute.
pub const CONNECTION_INFO: &str = "micro.connection";

/// Key of the [`SecureSession`](crate::attributes::SecureSession) attribute.
pub const SECURE_SESSION: &str = "micro.secure-session";

/// Open, ordered mapping of context attributes attached to a request.
///
/// Keys are strings, values are type-tagged: a lookup names both the key and the type
/// it expects, and a value stored under that key with another type is not returned.
/// The mapping is filled while the request is converted and is read-only afterwards.
#[derive(Clone, Default)]
pub struct Attributes {
    entries: Arc<Vec<(String, Arc<dyn Any + Send + Sync>)>>,
}

impl Attributes {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> AttributesBuilder {
        AttributesBuilder { entries: Vec::new() }
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).and_then(|(_, value)| value.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

#[derive(Default)]
pub struct AttributesBuilder {
    entries: Vec<(String, Arc<dyn Any + Send + Sync>)>,
}

impl AttributesBuilder {
    /// Adds an attribute; a later insert under the same key replaces the earlier one
    /// but keeps its position.
    pub fn insert<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        let value: Arc<dyn Any + Send + Sync> = Arc::new(value);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn build(self) -> Attributes {
        Attributes { entries: Arc::new(self.entries) }
    }
}

impl fmt::Debug for AttributesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.iter().map(|(k, _)| k)).finish()
    }
}
