//! Inbound message queue.
//!
//! FIFO buffer between the transport poll and scene dispatch. Owned
//! exclusively by the client driver; drained completely each frame before
//! the next network poll, so a message is delivered exactly once and
//! global receipt order is preserved across frames.

use std::collections::VecDeque;

use realm_shared::wire::Message;

#[derive(Default)]
pub struct MessageQueue {
    inner: VecDeque<Message>,
}

impl MessageQueue {
    pub fn push(&mut self, msg: Message) {
        self.inner.push_back(msg);
    }

    /// Appends messages, preserving their order.
    pub fn extend(&mut self, msgs: impl IntoIterator<Item = Message>) {
        self.inner.extend(msgs);
    }

    /// Removes and returns the whole queue as one ordered batch.
    pub fn drain_batch(&mut self) -> Vec<Message> {
        self.inner.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_shared::wire::PlayerId;

    #[test]
    fn drain_returns_fifo_order_and_empties() {
        let mut q = MessageQueue::default();
        q.push(Message::PlayerLeave {
            player_id: PlayerId(1),
        });
        q.extend([Message::PlayersRequest, Message::VersionRequest]);

        let batch = q.drain_batch();
        assert_eq!(
            batch,
            vec![
                Message::PlayerLeave {
                    player_id: PlayerId(1)
                },
                Message::PlayersRequest,
                Message::VersionRequest,
            ]
        );
        assert!(q.is_empty());
        assert!(q.drain_batch().is_empty());
    }
}
