//! # Flow Registry
//!
//! Maps conversation keys to their live flow instance for a single flow definition.
//! Owned by exactly one [`Flow`](super::Flow); never shared.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;

use super::coroutine::{Coroutine, Step};
use super::error::FlowError;

/// One suspended execution of a flow body, registered under `key`.
pub struct FlowInstance<K, I, O> {
    key: K,
    coroutine: Coroutine<I, O>,
    pending: Option<Step<O>>,
    steps: u64,
    started_at: DateTime<Utc>,
}

impl<K, I, O> FlowInstance<K, I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Wraps a coroutine that has already been advanced, keeping the value it produced.
    pub fn new(key: K, coroutine: Coroutine<I, O>, pending: Step<O>) -> Self {
        Self {
            key,
            coroutine,
            pending: Some(pending),
            steps: 0,
            started_at: Utc::now(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// The result of the initial advance made when the instance was started.
    pub fn pending(&self) -> Option<&Step<O>> {
        self.pending.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_terminated(&self) -> bool {
        self.coroutine.is_terminated()
    }

    pub async fn resume(&mut self, input: I) -> Result<Step<O>, FlowError> {
        self.steps += 1;
        self.coroutine.resume(input).await
    }
}

pub struct FlowRegistry<K, I, O> {
    instances: HashMap<K, FlowInstance<K, I, O>>,
}

impl<K, I, O> Default for FlowRegistry<K, I, O> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

impl<K, I, O> FlowRegistry<K, I, O>
where
    K: Eq + Hash + Clone,
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a non-terminated instance is registered under `key`.
    pub fn is_running(&self, key: &K) -> bool {
        self.instances
            .get(key)
            .is_some_and(|instance| !instance.is_terminated())
    }

    /// Registers `instance`, replacing whatever was there. Returns the replaced instance.
    pub fn put(&mut self, key: K, instance: FlowInstance<K, I, O>) -> Option<FlowInstance<K, I, O>> {
        self.instances.insert(key, instance)
    }

    pub fn get(&self, key: &K) -> Option<&FlowInstance<K, I, O>> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut FlowInstance<K, I, O>> {
        self.instances.get_mut(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<FlowInstance<K, I, O>> {
        self.instances.remove(key)
    }

    /// Keys of every instance that can still be stepped.
    pub fn running_keys(&self) -> Vec<K> {
        self.instances
            .values()
            .filter(|instance| !instance.is_terminated())
            .map(|instance| instance.key().clone())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
