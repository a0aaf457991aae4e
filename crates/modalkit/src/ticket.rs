#![forbid(unsafe_code)]

//! Result tickets: one future per show-family call.
//!
//! A ticket settles exactly once, with the flag its dialog finalized on. If
//! the manager (or the dialog's resolver) is gone before finalization, the
//! ticket settles with [`DialogError::ManagerClosed`]; a ticket obtained
//! from a dead [`ManagerHandle`](crate::ManagerHandle) errs on first poll.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use modalkit_core::Flag;
use tokio::sync::oneshot;

use crate::error::DialogError;
use crate::observe::DialogId;

/// Pending result of one dialog.
#[derive(Debug)]
pub struct DialogTicket {
    id: Option<DialogId>,
    receiver: Option<oneshot::Receiver<Flag>>,
}

impl DialogTicket {
    pub(crate) fn new(id: DialogId, receiver: oneshot::Receiver<Flag>) -> Self {
        Self {
            id: Some(id),
            receiver: Some(receiver),
        }
    }

    /// A ticket for a manager that is already gone; errs on first poll.
    pub(crate) fn closed() -> Self {
        Self {
            id: None,
            receiver: None,
        }
    }

    /// The dialog this ticket belongs to, if the show call reached a live
    /// manager.
    #[must_use]
    pub fn id(&self) -> Option<DialogId> {
        self.id
    }
}

impl Future for DialogTicket {
    type Output = Result<Flag, DialogError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.receiver.as_mut() {
            None => Poll::Ready(Err(DialogError::ManagerClosed)),
            Some(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(flag)) => {
                    this.receiver = None;
                    Poll::Ready(Ok(flag))
                }
                Poll::Ready(Err(_)) => {
                    this.receiver = None;
                    Poll::Ready(Err(DialogError::ManagerClosed))
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
