use crossbeam_channel as chan;

const MAX_QUEUE_SIZE: usize = 1024;

/// Send half of a [`Queue`].
///
/// [`Queue`]: struct.Queue.html
pub type Sender<T> = chan::Sender<T>;

/// Receive half of a [`Queue`].
///
/// [`Queue`]: struct.Queue.html
pub type Receiver<T> = chan::Receiver<T>;

/// A thread-safe queue of retired resource IDs.
#[derive(Clone)]
pub struct Queue<T> {
    /// Send half of the queue.
    tx: Sender<T>,

    /// Receive half of the queue.
    rx: Receiver<T>,
}

impl<T> Queue<T> {
    /// Constructor.
    pub fn new() -> Self {
        let (tx, rx) = chan::bounded(MAX_QUEUE_SIZE);
        Self { tx, rx }
    }

    /// Clone the send half of the queue.
    pub fn tx(&self) -> Sender<T> {
        self.tx.clone()
    }

    /// Remove the item from the front of the queue.
    pub fn next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Queue;

    #[test]
    fn items_arrive_in_send_order() {
        let queue = Queue::new();
        let tx = queue.tx();
        let _ = tx.send(1u32);
        let _ = tx.send(2u32);
        assert_eq!(Some(1), queue.next());
        assert_eq!(Some(2), queue.next());
        assert_eq!(None, queue.next());
    }
}
