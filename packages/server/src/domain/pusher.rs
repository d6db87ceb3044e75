//! Bounded outbound queue between the chat room and a connection's writer.
//!
//! Pushing never waits. When a client stops reading, its writer stalls on the
//! socket, the queue fills up and the next push raises the overflow signal;
//! the writer task watches that signal and gives up on the connection.

use std::sync::Arc;

use tokio::sync::{
    Notify,
    mpsc::{self, error::TryRecvError, error::TrySendError},
};
use tumult_shared::protocol::Frame;

/// Frames a client may have pending before it is dropped as too slow.
pub const PUSHER_QUEUE_CAPACITY: usize = 1024;

/// Sending side, held by the client's record.
#[derive(Debug, Clone)]
pub struct PusherChannel {
    sender: mpsc::Sender<Frame>,
    overflow: Arc<Notify>,
}

/// Receiving side, drained by the connection's writer task.
#[derive(Debug)]
pub struct PusherQueue {
    receiver: mpsc::Receiver<Frame>,
    overflow: Arc<Notify>,
}

pub fn pusher_channel() -> (PusherChannel, PusherQueue) {
    pusher_channel_with_capacity(PUSHER_QUEUE_CAPACITY)
}

pub fn pusher_channel_with_capacity(capacity: usize) -> (PusherChannel, PusherQueue) {
    let (sender, receiver) = mpsc::channel(capacity);
    let overflow = Arc::new(Notify::new());
    (
        PusherChannel {
            sender,
            overflow: overflow.clone(),
        },
        PusherQueue { receiver, overflow },
    )
}

impl PusherChannel {
    /// Enqueue without waiting. Returns `false` if the frame was not queued.
    ///
    /// A full queue also raises the overflow signal.
    pub fn push(&self, frame: Frame) -> bool {
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.overflow.notify_one();
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

impl PusherQueue {
    pub async fn recv(&mut self) -> Option<Frame> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Frame, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Signal raised when a push found the queue full.
    ///
    /// The permit is kept if nobody is waiting yet.
    pub fn overflow_signal(&self) -> Arc<Notify> {
        self.overflow.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_push_then_receive_in_order() {
        // テスト項目: 積んだフレームが順番どおりに取り出せる
        // given (前提条件):
        let (channel, mut queue) = pusher_channel();

        // when (操作):
        let first = channel.push(Frame::Join { nickname: None });
        let second = channel.push(Frame::Nickname { nickname: None });

        // then (期待する結果):
        assert!(first && second);
        assert_eq!(queue.try_recv().unwrap(), Frame::Join { nickname: None });
        assert_eq!(queue.try_recv().unwrap(), Frame::Nickname { nickname: None });
        assert!(queue.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_raises_overflow() {
        // テスト項目: キューが満杯のとき送信は失敗し、オーバーフローが通知される
        // given (前提条件):
        let (channel, queue) = pusher_channel_with_capacity(2);
        let overflow = queue.overflow_signal();
        assert!(channel.push(Frame::Join { nickname: None }));
        assert!(channel.push(Frame::Join { nickname: None }));

        // when (操作):
        let pushed = channel.push(Frame::Join { nickname: None });

        // then (期待する結果):
        assert!(!pushed);
        tokio::time::timeout(Duration::from_secs(1), overflow.notified())
            .await
            .expect("overflow was not signalled");
    }

    #[tokio::test]
    async fn test_closed_queue_does_not_raise_overflow() {
        // テスト項目: 受信側が閉じられた場合は送信が失敗するだけでオーバーフローは通知されない
        // given (前提条件):
        let (channel, queue) = pusher_channel_with_capacity(1);
        let overflow = queue.overflow_signal();
        drop(queue);

        // when (操作):
        let pushed = channel.push(Frame::Join { nickname: None });

        // then (期待する結果):
        assert!(!pushed);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), overflow.notified())
                .await
                .is_err()
        );
    }
}
