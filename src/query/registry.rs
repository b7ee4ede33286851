use once_cell::sync::Lazy;

use crate::config::QueryConfig;
use crate::filter::{FilterError, FilterMap};

use super::creators::{default_creators, DecoratorCreator};
use super::node::{BaseQuery, QueryNode};

/// Ordered set of decorator creators.
///
/// The creator list is sorted once, when the registry is built, and never
/// mutated afterwards. Registration takes `&mut self`, so a registry that is
/// shared between requests can no longer change.
pub struct DecoratorRegistry {
    creators: Vec<Box<dyn DecoratorCreator>>,
}

static GLOBAL: Lazy<DecoratorRegistry> =
    Lazy::new(|| DecoratorRegistry::with_defaults(&crate::config::config().query));

impl DecoratorRegistry {
    pub fn new(creators: Vec<Box<dyn DecoratorCreator>>) -> Self {
        let mut registry = Self { creators: Vec::with_capacity(creators.len()) };
        for creator in creators {
            registry.register(creator);
        }
        registry
    }

    pub fn with_defaults(config: &QueryConfig) -> Self {
        Self::new(default_creators(config))
    }

    /// Process-wide registry built from the global configuration on first use.
    pub fn global() -> &'static DecoratorRegistry {
        &GLOBAL
    }

    /// Insert after every creator of equal or lower priority, keeping the
    /// list sorted and stable with respect to registration order.
    pub fn register(&mut self, creator: Box<dyn DecoratorCreator>) {
        let priority = creator.priority();
        let index = self.creators.partition_point(|c| c.priority() <= priority);
        tracing::debug!("Registered creator '{}' with priority {}", creator.name(), priority);
        self.creators.insert(index, creator);
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    /// Creator names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.creators.iter().map(|c| c.name()).collect()
    }

    /// Wrap `base` and apply every creator in priority order.
    pub fn create_sql_decorator(&self, filters: &FilterMap, base: BaseQuery) -> Result<QueryNode, FilterError> {
        self.decorate(QueryNode::new(base), filters)
    }

    /// Apply every creator in priority order to an existing node. The first
    /// creator error aborts the whole chain.
    pub fn decorate(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        self.creators.iter().try_fold(node, |node, creator| {
            let before = node.clauses().len();
            let node = creator.create(node, filters).map_err(|e| {
                tracing::debug!("Creator {} rejected filters: {}", creator.name(), e);
                e
            })?;
            if node.clauses().len() != before {
                tracing::debug!("Creator {} applied", creator.name());
            }
            Ok(node)
        })
    }
}

impl Default for DecoratorRegistry {
    fn default() -> Self {
        Self::with_defaults(&QueryConfig::default())
    }
}
