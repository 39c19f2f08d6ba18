//! # Coroutine
//!
//! A resumable computation built on top of a plain future.
//!
//! The body receives a [`Suspender`] and offers values through
//! [`Suspender::suspend`]. Each offer parks the body and hands the value back
//! to whoever is driving it; the next [`Coroutine::resume`] feeds an input in
//! and the pending `suspend(..).await` evaluates to that input. Locals in the
//! body survive across suspensions because they live inside the future.
//!
//! Bodies may await other futures (timers, I/O) between two offers. The
//! driver only returns once the body offers a value or finishes, and the
//! body never makes progress unless a driver is awaiting it.

use futures::future::{BoxFuture, FutureExt, poll_fn};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use super::error::FlowError;

/// Result of driving a coroutine to its next stopping point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<O> {
    /// The body offered a value and waits for the next input.
    Suspended(O),
    /// The body returned.
    Terminated(O),
}

impl<O> Step<O> {
    pub fn value(&self) -> &O {
        match self {
            Step::Suspended(value) | Step::Terminated(value) => value,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Step::Terminated(_))
    }
}

/// Hand-off point between the body and its driver.
struct Slot<I, O> {
    offered: Option<O>,
    input: Option<I>,
}

type SharedSlot<I, O> = Arc<Mutex<Slot<I, O>>>;

fn lock<I, O>(slot: &SharedSlot<I, O>) -> MutexGuard<'_, Slot<I, O>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Body-side handle used to offer values and receive inputs.
pub struct Suspender<I, O> {
    slot: SharedSlot<I, O>,
}

impl<I, O> Suspender<I, O> {
    /// Offers `value` to the driver and waits for the next input.
    pub fn suspend(&self, value: O) -> Suspend<'_, I, O> {
        Suspend {
            slot: &self.slot,
            value: Some(value),
        }
    }
}

/// Future returned by [`Suspender::suspend`].
pub struct Suspend<'a, I, O> {
    slot: &'a SharedSlot<I, O>,
    value: Option<O>,
}

// No field is structurally pinned.
impl<I, O> Unpin for Suspend<'_, I, O> {}

impl<I, O> Future for Suspend<'_, I, O> {
    type Output = I;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<I> {
        let this = &mut *self;
        let mut slot = lock(this.slot);

        // First poll: publish the offer and park.
        if let Some(value) = this.value.take() {
            slot.offered = Some(value);
            return Poll::Pending;
        }

        match slot.input.take() {
            Some(input) => Poll::Ready(input),
            None => Poll::Pending,
        }
    }
}

enum Outcome<O> {
    Offered(O),
    Finished(anyhow::Result<O>),
}

/// A suspended computation: the flow body bound to its start arguments.
pub struct Coroutine<I, O> {
    slot: SharedSlot<I, O>,
    body: Option<BoxFuture<'static, anyhow::Result<O>>>,
    started: bool,
}

impl<I, O> Coroutine<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Binds `body` to `args`. None of the body runs until [`advance`](Self::advance).
    pub fn new<F, Fut, A>(body: F, args: A) -> Self
    where
        F: FnOnce(Suspender<I, O>, A) -> Fut,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Slot {
            offered: None,
            input: None,
        }));
        let suspender = Suspender { slot: slot.clone() };

        Self {
            slot,
            body: Some(body(suspender, args).boxed()),
            started: false,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.body.is_none()
    }

    /// Runs the body from its beginning up to the first suspension or to its end.
    pub async fn advance(&mut self) -> Result<Step<O>, FlowError> {
        if self.is_terminated() {
            return Err(FlowError::AlreadyTerminated);
        }
        if self.started {
            return Err(FlowError::AwaitingInput);
        }
        self.drive(None).await
    }

    /// Delivers `input` to the pending suspension point and runs to the next one.
    pub async fn resume(&mut self, input: I) -> Result<Step<O>, FlowError> {
        if self.is_terminated() {
            return Err(FlowError::AlreadyTerminated);
        }
        if !self.started {
            return Err(FlowError::NotStarted);
        }
        self.drive(Some(input)).await
    }

    async fn drive(&mut self, input: Option<I>) -> Result<Step<O>, FlowError> {
        let body = self.body.as_mut().ok_or(FlowError::AlreadyTerminated)?;
        self.started = true;

        let slot = &self.slot;
        lock(slot).input = input;

        let outcome = poll_fn(|cx| match body.as_mut().poll(cx) {
            Poll::Ready(result) => Poll::Ready(Outcome::Finished(result)),
            Poll::Pending => match lock(slot).offered.take() {
                Some(value) => Poll::Ready(Outcome::Offered(value)),
                // Waiting on something other than an input; its waker is ours.
                None => Poll::Pending,
            },
        })
        .await;

        lock(slot).input = None;

        match outcome {
            Outcome::Offered(value) => Ok(Step::Suspended(value)),
            Outcome::Finished(result) => {
                self.body = None;
                result.map(Step::Terminated).map_err(FlowError::Body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn running_total(co: Suspender<i32, i32>, start: i32) -> anyhow::Result<i32> {
        let mut total = start;
        loop {
            let next = co.suspend(total).await;
            if next == 0 {
                return Ok(total * 100);
            }
            total += next;
        }
    }

    #[tokio::test]
    async fn test_creation_runs_nothing() {
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        let co = Coroutine::<(), ()>::new(
            move |_co, _: ()| async move {
                *flag.lock().unwrap() = true;
                Ok(())
            },
            (),
        );

        assert!(!co.started);
        assert!(!*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_advance_then_resume_keeps_locals() {
        let mut co = Coroutine::new(running_total, 5);

        assert_eq!(co.advance().await.unwrap(), Step::Suspended(5));
        assert_eq!(co.resume(3).await.unwrap(), Step::Suspended(8));
        assert_eq!(co.resume(-1).await.unwrap(), Step::Suspended(7));
        assert_eq!(co.resume(0).await.unwrap(), Step::Terminated(700));
        assert!(co.is_terminated());
    }

    #[tokio::test]
    async fn test_body_without_suspension_terminates_on_advance() {
        let mut co = Coroutine::<i32, &str>::new(|_co, name: &'static str| async move { Ok(name) }, "bob");

        assert_eq!(co.advance().await.unwrap(), Step::Terminated("bob"));
        assert!(co.is_terminated());
    }

    #[tokio::test]
    async fn test_driving_after_termination_fails() {
        let mut co = Coroutine::new(running_total, 1);
        co.advance().await.unwrap();
        co.resume(0).await.unwrap();

        assert!(matches!(co.resume(4).await, Err(FlowError::AlreadyTerminated)));
        assert!(matches!(co.advance().await, Err(FlowError::AlreadyTerminated)));
    }

    #[tokio::test]
    async fn test_advance_twice_needs_input() {
        let mut co = Coroutine::new(running_total, 1);
        co.advance().await.unwrap();

        assert!(matches!(co.advance().await, Err(FlowError::AwaitingInput)));
        // Still resumable afterwards.
        assert_eq!(co.resume(1).await.unwrap(), Step::Suspended(2));
    }

    #[tokio::test]
    async fn test_resume_before_start_is_rejected() {
        let mut co = Coroutine::new(running_total, 1);
        assert!(matches!(co.resume(1).await, Err(FlowError::NotStarted)));
    }

    #[tokio::test]
    async fn test_body_error_ends_the_coroutine() {
        let mut co = Coroutine::<u32, u32>::new(
            |co, limit: u32| async move {
                let value = co.suspend(0).await;
                if value > limit {
                    anyhow::bail!("{value} is over the limit");
                }
                Ok(value)
            },
            10,
        );
        co.advance().await.unwrap();

        let err = co.resume(11).await.unwrap_err();
        assert!(matches!(err, FlowError::Body(_)));
        assert_eq!(err.to_string(), "11 is over the limit");
        assert!(co.is_terminated());
    }

    #[tokio::test]
    async fn test_body_may_await_between_suspensions() {
        let mut co = Coroutine::<String, String>::new(
            |co, _: ()| async move {
                let first = co.suspend("ready".to_string()).await;
                tokio::time::sleep(Duration::from_millis(5)).await;
                tokio::task::yield_now().await;
                let second = co.suspend(format!("got {first}")).await;
                Ok(format!("{first}+{second}"))
            },
            (),
        );

        assert_eq!(co.advance().await.unwrap(), Step::Suspended("ready".to_string()));
        assert_eq!(co.resume("a".into()).await.unwrap(), Step::Suspended("got a".to_string()));
        assert_eq!(co.resume("b".into()).await.unwrap(), Step::Terminated("a+b".to_string()));
    }

    #[test]
    fn test_step_accessors() {
        let step = Step::Suspended(3);
        assert_eq!(*step.value(), 3);
        assert!(!step.is_terminated());
        assert!(Step::Terminated(1).is_terminated());
        assert_eq!(*Step::Terminated("x").value(), "x");
    }
}
