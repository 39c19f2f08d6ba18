//! # Flow Engine
//!
//! Drives one flow definition across every conversation key it is started for.
//!
//! Handlers call [`Flow::start`] when a conversation begins and
//! [`Flow::step`] for each later message. `step` returns `None` when no
//! instance is running for the key, otherwise the value the body offered
//! (suspended) or returned (terminated). Terminated instances are removed
//! straight away, so stepping them again is a plain `None`.

use futures::future::{BoxFuture, FutureExt};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, warn};

use super::coroutine::{Coroutine, Step, Suspender};
use super::error::FlowError;
use super::registry::{FlowInstance, FlowRegistry};
use crate::domain::types::RestartPolicy;

type FlowBody<I, O, A> =
    Arc<dyn Fn(Suspender<I, O>, A) -> BoxFuture<'static, anyhow::Result<O>> + Send + Sync>;

pub struct Flow<K, I, O, A> {
    name: String,
    body: FlowBody<I, O, A>,
    registry: FlowRegistry<K, I, O>,
    policy: RestartPolicy,
}

impl<K, I, O, A> Flow<K, I, O, A>
where
    K: Eq + Hash + Clone + Debug,
    I: Send + 'static,
    O: Clone + Send + 'static,
    A: 'static,
{
    pub fn new<F, Fut>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Suspender<I, O>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(move |suspender, args| body(suspender, args).boxed()),
            registry: FlowRegistry::new(),
            policy: RestartPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RestartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Starts a new instance for `key` and runs it up to its first suspension.
    ///
    /// The value produced by that first run is returned and also kept as the
    /// instance's pending result; `step` never delivers it again. A body that
    /// returns during this first run is never registered. A running instance
    /// for the same key is replaced or refused depending on the restart
    /// policy, and is left untouched if the new body fails.
    pub async fn start(&mut self, key: K, args: A) -> Result<Step<O>, FlowError> {
        if self.registry.is_running(&key) {
            match self.policy {
                RestartPolicy::Reject => {
                    return Err(FlowError::AlreadyRunning {
                        flow: self.name.clone(),
                        key: format!("{key:?}"),
                    });
                }
                RestartPolicy::Replace => {
                    warn!(flow = %self.name, key = ?key, "Replacing running flow instance");
                }
            }
        }

        let body = Arc::clone(&self.body);
        let mut coroutine = Coroutine::new(move |suspender, args| body(suspender, args), args);

        // A failing body never gets registered; whatever ran before stays.
        let initial = coroutine.advance().await.inspect_err(|e| {
            warn!(flow = %self.name, key = ?key, "Flow failed while starting: {}", e);
        })?;

        if initial.is_terminated() {
            self.registry.remove(&key);
            debug!(flow = %self.name, key = ?key, "Flow finished while starting");
            return Ok(initial);
        }

        debug!(flow = %self.name, key = ?key, "Flow started");
        self.registry
            .put(key.clone(), FlowInstance::new(key, coroutine, initial.clone()));
        Ok(initial)
    }

    /// Resumes the instance for `key` with `input`.
    ///
    /// Returns `Ok(None)` if nothing is running for `key`. A body error removes
    /// the instance before propagating.
    pub async fn step(&mut self, key: &K, input: I) -> Result<Option<O>, FlowError> {
        let Some(instance) = self.registry.get_mut(key) else {
            return Ok(None);
        };
        if instance.is_terminated() {
            self.registry.remove(key);
            return Ok(None);
        }

        let result = instance.resume(input).await;
        match result {
            Ok(Step::Suspended(value)) => {
                debug!(flow = %self.name, key = ?key, "Flow stepped");
                Ok(Some(value))
            }
            Ok(Step::Terminated(value)) => {
                if let Some(finished) = self.registry.remove(key) {
                    let elapsed = chrono::Utc::now() - finished.started_at();
                    debug!(
                        flow = %self.name,
                        key = ?key,
                        steps = finished.steps(),
                        elapsed_ms = elapsed.num_milliseconds(),
                        "Flow terminated"
                    );
                }
                Ok(Some(value))
            }
            Err(e) => {
                self.registry.remove(key);
                warn!(flow = %self.name, key = ?key, "Flow instance removed after error: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_running(&self, key: &K) -> bool {
        self.registry.is_running(key)
    }

    /// Result of the initial advance of the instance registered under `key`.
    pub fn pending(&self, key: &K) -> Option<&Step<O>> {
        self.registry.get(key).and_then(|instance| instance.pending())
    }

    /// Drops the instance for `key` without running it. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        let removed = self.registry.remove(key).is_some();
        if removed {
            debug!(flow = %self.name, key = ?key, "Flow cancelled");
        }
        removed
    }

    pub fn running_keys(&self) -> Vec<K> {
        self.registry.running_keys()
    }
}
