use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::deck::TransitionTicket;
use crate::gesture::SettleTimer;

const LOG_PREFIX: &str = "[settle-timer]";

/// [`SettleTimer`] backed by a tokio task that sends the ticket back
/// through a channel once the delay has elapsed.
#[derive(Debug)]
pub struct TokioSettleTimer<M> {
    tx: UnboundedSender<M>,
    wrap: fn(TransitionTicket) -> M,
    task: Option<JoinHandle<()>>,
}

impl<M: Send + 'static> TokioSettleTimer<M> {
    /// `wrap` turns the fired ticket into the channel's message type.
    pub fn new(tx: UnboundedSender<M>, wrap: fn(TransitionTicket) -> M) -> Self {
        Self {
            tx,
            wrap,
            task: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.task
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }
}

impl<M: Send + 'static> SettleTimer for TokioSettleTimer<M> {
    fn schedule(&mut self, ticket: TransitionTicket, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        let message = (self.wrap)(ticket);
        log::debug!("{} {} due in {:?}", LOG_PREFIX, ticket, delay);
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // the receiver is gone once the screen is dropped
            let _ = tx.send(message);
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<M> Drop for TokioSettleTimer<M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
