use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A request came back 401 and the stored token was dropped.
    Expired,
}

#[derive(Clone)]
pub struct SessionBus {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionBus {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Never blocks; a full or closed channel drops the event.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.try_send(event);
    }
}
