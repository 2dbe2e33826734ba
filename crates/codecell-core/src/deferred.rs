#![forbid(unsafe_code)]

//! One-shot deferred results.
//!
//! [`channel`] creates a ([`Resolver`], [`Deferred`]) pair over a
//! `futures` oneshot. The producer settles the resolver once with
//! [`Resolver::resolve`] or [`Resolver::reject`]; the consumer observes the
//! outcome by polling [`Deferred::try_result`] each frame or by awaiting the
//! deferred as a [`Future`].
//!
//! # Invariants
//!
//! 1. A deferred settles at most once. Settling consumes the resolver, so a
//!    second settle is unrepresentable.
//! 2. Dropping an unsettled resolver settles the deferred with the
//!    `abandoned` error given to [`channel`]. A torn-down producer therefore
//!    never leaves a consumer waiting forever.
//! 3. Awaiting takes the outcome; afterwards `try_result` returns `None`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// Create an unsettled deferred and its resolver.
///
/// `abandoned` is delivered if the resolver is dropped without settling.
pub fn channel<T, E>(abandoned: E) -> (Resolver<T, E>, Deferred<T, E>) {
    let (sender, receiver) = oneshot::channel();
    (
        Resolver { sender },
        Deferred {
            state: State::Pending {
                receiver,
                abandoned,
            },
        },
    )
}

/// Producer half of a deferred result.
#[derive(Debug)]
pub struct Resolver<T, E> {
    sender: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Resolver<T, E> {
    /// Settle successfully.
    pub fn resolve(self, value: T) {
        // The consumer may already be gone; nobody is left to tell.
        let _ = self.sender.send(Ok(value));
    }

    /// Settle with a failure.
    pub fn reject(self, error: E) {
        let _ = self.sender.send(Err(error));
    }
}

#[derive(Debug)]
enum State<T, E> {
    Pending {
        receiver: oneshot::Receiver<Result<T, E>>,
        abandoned: E,
    },
    Settled(Result<T, E>),
    Taken,
}

/// Consumer half of a deferred result.
#[derive(Debug)]
pub struct Deferred<T, E> {
    state: State<T, E>,
}

// Never pinned structurally; the receiver is `Unpin` and outcomes are moved.
impl<T, E> Unpin for Deferred<T, E> {}

impl<T, E> Deferred<T, E> {
    /// A deferred that has already failed.
    pub fn rejected(error: E) -> Self {
        Self {
            state: State::Settled(Err(error)),
        }
    }

    /// Pull the outcome out of the receiver if the producer has settled.
    fn settle_now(&mut self) {
        let State::Pending { receiver, .. } = &mut self.state else {
            return;
        };
        let outcome = match receiver.try_recv() {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return,
            Err(oneshot::Canceled) => match std::mem::replace(&mut self.state, State::Taken) {
                State::Pending { abandoned, .. } => Err(abandoned),
                _ => return,
            },
        };
        self.state = State::Settled(outcome);
    }

    /// Whether the producer has settled this deferred.
    pub fn is_settled(&mut self) -> bool {
        self.settle_now();
        !matches!(self.state, State::Pending { .. })
    }

    /// The outcome, if settled and not yet taken by `.await`.
    pub fn try_result(&mut self) -> Option<Result<T, E>>
    where
        T: Clone,
        E: Clone,
    {
        self.settle_now();
        match &self.state {
            State::Settled(outcome) => Some(outcome.clone()),
            State::Pending { .. } | State::Taken => None,
        }
    }
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outcome = match &mut this.state {
            State::Pending { receiver, .. } => match Pin::new(receiver).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(outcome)) => outcome,
                Poll::Ready(Err(oneshot::Canceled)) => {
                    match std::mem::replace(&mut this.state, State::Taken) {
                        State::Pending { abandoned, .. } => Err(abandoned),
                        _ => return Poll::Pending,
                    }
                }
            },
            State::Settled(_) => match std::mem::replace(&mut this.state, State::Taken) {
                State::Settled(outcome) => outcome,
                _ => return Poll::Pending,
            },
            State::Taken => return Poll::Pending,
        };
        this.state = State::Taken;
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::task::noop_waker_ref;

    #[derive(Debug, Clone, PartialEq)]
    enum Fail {
        Gone,
        Boom,
    }

    fn poll_once<T, E>(deferred: &mut Deferred<T, E>) -> Poll<Result<T, E>> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(deferred).poll(&mut cx)
    }

    #[test]
    fn pending_until_resolved() {
        let (resolver, mut deferred) = channel::<u8, Fail>(Fail::Gone);
        assert!(!deferred.is_settled());
        assert_eq!(deferred.try_result(), None);

        resolver.resolve(7);
        assert!(deferred.is_settled());
        assert_eq!(deferred.try_result(), Some(Ok(7)));
        // Reading does not consume.
        assert_eq!(deferred.try_result(), Some(Ok(7)));
    }

    #[test]
    fn reject_delivers_error() {
        let (resolver, mut deferred) = channel::<(), Fail>(Fail::Gone);
        resolver.reject(Fail::Boom);
        assert_eq!(deferred.try_result(), Some(Err(Fail::Boom)));
    }

    #[test]
    fn dropped_resolver_abandons() {
        let (resolver, mut deferred) = channel::<(), Fail>(Fail::Gone);
        drop(resolver);
        assert_eq!(deferred.try_result(), Some(Err(Fail::Gone)));
    }

    #[test]
    fn await_yields_outcome_then_takes_it() {
        let (resolver, mut deferred) = channel::<u8, Fail>(Fail::Gone);
        assert!(poll_once(&mut deferred).is_pending());
        resolver.resolve(3);
        assert_eq!(poll_once(&mut deferred), Poll::Ready(Ok(3)));
        assert_eq!(deferred.try_result(), None);
        assert!(deferred.is_settled());
    }

    #[test]
    fn block_on_sees_abandonment() {
        let (resolver, deferred) = channel::<u8, Fail>(Fail::Gone);
        drop(resolver);
        assert_eq!(block_on(deferred), Err(Fail::Gone));
    }

    #[test]
    fn cached_outcome_is_awaitable() {
        let (resolver, mut deferred) = channel::<u8, Fail>(Fail::Gone);
        resolver.resolve(9);
        assert_eq!(deferred.try_result(), Some(Ok(9)));
        assert_eq!(block_on(deferred), Ok(9));
    }

    #[test]
    fn prebuilt_rejection_is_settled() {
        let mut failed = Deferred::<(), Fail>::rejected(Fail::Boom);
        assert!(failed.is_settled());
        assert_eq!(failed.try_result(), Some(Err(Fail::Boom)));
    }
}
