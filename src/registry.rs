//! Adapter registry: keyword lookup of numeric and string adapters.
//!
//! Heavy adapters (arbitrary-precision decimals, grapheme-cluster splitting)
//! are opt-in: a plugin registers a factory under one or more keywords, then
//! a counter selects it by name. Counters take an [`AdapterRegistry`] by
//! reference or fall back to the process-wide [`default_registry`].

use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use crate::number::{FloatAdapter, NumberAdapter};
use crate::unicode::{CharAdapter, SegmenterAdapter, StringAdapter};

type Factory<A> = Arc<dyn Fn() -> Arc<A> + Send + Sync>;

struct Entry<A: ?Sized> {
    keywords: Vec<String>,
    factory: Factory<A>,
}

impl<A: ?Sized> Clone for Entry<A> {
    fn clone(&self) -> Self {
        Self {
            keywords: self.keywords.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

/// Keyword-to-factory table for one adapter kind.
struct Table<A: ?Sized> {
    entries: Vec<Entry<A>>,
}

impl<A: ?Sized> Clone for Table<A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<A: ?Sized> Table<A> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry. Keywords already claimed by older entries move to the
    /// new one.
    fn register(&mut self, keywords: &[&str], factory: Factory<A>) {
        for entry in &mut self.entries {
            entry.keywords.retain(|k| !keywords.contains(&k.as_str()));
        }
        self.entries.retain(|entry| !entry.keywords.is_empty());
        self.entries.push(Entry {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            factory,
        });
    }

    fn create(&self, name: &str) -> Option<Arc<A>> {
        self.entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| k == name))
            .map(|entry| (entry.factory)())
    }

    fn keywords(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.keywords.iter().map(String::as_str))
            .collect()
    }
}

/// Either a keyword to look up or a ready-made adapter.
#[derive(Clone, Debug)]
pub enum AdapterChoice<A: ?Sized> {
    Named(String),
    Instance(Arc<A>),
}

impl<A: ?Sized> From<&str> for AdapterChoice<A> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<A: ?Sized> From<String> for AdapterChoice<A> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<A: ?Sized> From<Arc<A>> for AdapterChoice<A> {
    fn from(adapter: Arc<A>) -> Self {
        Self::Instance(adapter)
    }
}

/// Registered adapter factories plus the currently selected adapters.
#[derive(Clone)]
pub struct AdapterRegistry {
    numbers: Table<dyn NumberAdapter>,
    strings: Table<dyn StringAdapter>,
    number_adapter: Arc<dyn NumberAdapter>,
    string_adapter: Arc<dyn StringAdapter>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("numbers", &self.numbers.keywords())
            .field("strings", &self.strings.keywords())
            .field("number_adapter", &self.number_adapter.name())
            .field("string_adapter", &self.string_adapter.name())
            .finish()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterRegistry {
    /// A registry seeded with the built-in adapters: `"number"`, `"string"`
    /// and `"intl-segmenter"`. The selected adapters are `"number"` and
    /// `"string"`.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            numbers: Table::new(),
            strings: Table::new(),
            number_adapter: Arc::new(FloatAdapter),
            string_adapter: Arc::new(CharAdapter),
        };
        registry.register_number_adapter(&["number"], || {
            Arc::new(FloatAdapter) as Arc<dyn NumberAdapter>
        });
        registry.register_string_adapter(&["string"], || {
            Arc::new(CharAdapter) as Arc<dyn StringAdapter>
        });
        registry.register_string_adapter(&["intl-segmenter"], || {
            Arc::new(SegmenterAdapter) as Arc<dyn StringAdapter>
        });
        registry
    }

    /// Register a numeric adapter factory. A later registration wins for any
    /// keyword both share.
    pub fn register_number_adapter<F>(&mut self, keywords: &[&str], factory: F)
    where
        F: Fn() -> Arc<dyn NumberAdapter> + Send + Sync + 'static,
    {
        tracing::debug!(?keywords, "registering number adapter");
        self.numbers.register(keywords, Arc::new(factory));
    }

    /// Register a string adapter factory. A later registration wins for any
    /// keyword both share.
    pub fn register_string_adapter<F>(&mut self, keywords: &[&str], factory: F)
    where
        F: Fn() -> Arc<dyn StringAdapter> + Send + Sync + 'static,
    {
        tracing::debug!(?keywords, "registering string adapter");
        self.strings.register(keywords, Arc::new(factory));
    }

    /// Run a plugin's registration hook against this registry.
    pub fn register_plugin<P>(&mut self, plugin: P)
    where
        P: FnOnce(&mut Self),
    {
        plugin(self);
    }

    /// Select the numeric adapter. Unknown names fall back to `"number"`.
    pub fn set_number_adapter(&mut self, choice: impl Into<AdapterChoice<dyn NumberAdapter>>) {
        self.number_adapter = match choice.into() {
            AdapterChoice::Instance(adapter) => adapter,
            AdapterChoice::Named(name) => self.numbers.create(&name).unwrap_or_else(|| {
                tracing::debug!(%name, "unknown number adapter, using default");
                Arc::new(FloatAdapter)
            }),
        };
    }

    /// Select the string adapter. Unknown names fall back to `"string"`.
    pub fn set_string_adapter(&mut self, choice: impl Into<AdapterChoice<dyn StringAdapter>>) {
        self.string_adapter = match choice.into() {
            AdapterChoice::Instance(adapter) => adapter,
            AdapterChoice::Named(name) => self.strings.create(&name).unwrap_or_else(|| {
                tracing::debug!(%name, "unknown string adapter, using default");
                Arc::new(CharAdapter)
            }),
        };
    }

    #[must_use]
    pub fn number_adapter(&self) -> Arc<dyn NumberAdapter> {
        Arc::clone(&self.number_adapter)
    }

    #[must_use]
    pub fn string_adapter(&self) -> Arc<dyn StringAdapter> {
        Arc::clone(&self.string_adapter)
    }

    /// Instantiate a registered numeric adapter without selecting it.
    #[must_use]
    pub fn create_number_adapter(&self, name: &str) -> Option<Arc<dyn NumberAdapter>> {
        self.numbers.create(name)
    }

    /// Instantiate a registered string adapter without selecting it.
    #[must_use]
    pub fn create_string_adapter(&self, name: &str) -> Option<Arc<dyn StringAdapter>> {
        self.strings.create(name)
    }

    #[must_use]
    pub fn number_keywords(&self) -> Vec<&str> {
        self.numbers.keywords()
    }

    #[must_use]
    pub fn string_keywords(&self) -> Vec<&str> {
        self.strings.keywords()
    }
}

fn global() -> &'static RwLock<AdapterRegistry> {
    static REGISTRY: OnceLock<RwLock<AdapterRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(AdapterRegistry::new()))
}

/// Snapshot of the process-wide registry.
#[must_use]
pub fn default_registry() -> AdapterRegistry {
    match global().read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Mutate the process-wide registry. Counters created afterwards observe the
/// change; existing counters keep the adapters they were built with.
pub fn with_default_registry<R>(f: impl FnOnce(&mut AdapterRegistry) -> R) -> R {
    let mut guard = match global().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut guard)
}

/// Select the process-wide numeric adapter.
pub fn set_number_adapter(choice: impl Into<AdapterChoice<dyn NumberAdapter>>) {
    with_default_registry(|registry| registry.set_number_adapter(choice));
}

/// Select the process-wide string adapter.
pub fn set_string_adapter(choice: impl Into<AdapterChoice<dyn StringAdapter>>) {
    with_default_registry(|registry| registry.set_string_adapter(choice));
}
