//! Message queue implementation
//!
//! Fixed-capacity FIFO of 4-byte items. A post to a queue with waiting
//! receivers hands the item straight to the highest-priority receiver; a
//! receive that frees a slot admits the highest-priority blocked sender.

use core::mem::size_of;

use heapless::Deque;

use crate::config::CFG_QUEUE_DEPTH_MAX;
use crate::error::{OsError, OsResult};
use crate::kernel::{Kernel, Pend};
use crate::sync::wait_list::PendList;
use crate::task::{Reply, TaskEntry};
use crate::types::{OsMsg, OsPendOn, QueueId, TaskId};

/// Queue control block
pub struct OsQueue {
    /// Items currently stored, oldest first
    pub(crate) items: Deque<OsMsg, CFG_QUEUE_DEPTH_MAX>,
    /// Number of items the queue can hold
    pub(crate) length: usize,
    /// Tasks blocked waiting to post onto this queue
    pub(crate) send_waiters: PendList,
    /// Tasks blocked waiting to read from this queue
    pub(crate) recv_waiters: PendList,
}

impl OsQueue {
    fn new(length: usize) -> Self {
        OsQueue {
            items: Deque::new(),
            length,
            send_waiters: PendList::new(),
            recv_waiters: PendList::new(),
        }
    }

    #[inline]
    pub fn messages_waiting(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn spaces_available(&self) -> usize {
        self.length - self.items.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.length
    }

    /// Store an item. Caller has checked for room.
    fn store(&mut self, item: OsMsg, front: bool) {
        let _ = if front {
            self.items.push_front(item)
        } else {
            self.items.push_back(item)
        };
    }
}

impl<T: TaskEntry> Kernel<T> {
    /// Create a queue holding up to `length` items
    ///
    /// # Returns
    /// * `Ok(QueueId)` - Queue created, empty
    /// * `Err(OsError::QMax)` - Length is zero or above the configured depth
    /// * `Err(OsError::QNoMoreObj)` - Queue pool exhausted
    pub fn queue_create(&mut self, length: usize) -> OsResult<QueueId> {
        if length == 0 || length > CFG_QUEUE_DEPTH_MAX {
            return Err(OsError::QMax);
        }

        let id = QueueId(self.queues.len() as u8);
        self.queues
            .push(OsQueue::new(length))
            .map_err(|_| OsError::QNoMoreObj)?;

        crate::debug!("queue {} created, length {}", id.number(), length);
        Ok(id)
    }

    /// Size in bytes of each queue item
    #[inline]
    pub fn queue_item_size(&self) -> usize {
        size_of::<OsMsg>()
    }

    pub(crate) fn queue_ref(&self, queue: QueueId) -> OsResult<&OsQueue> {
        self.queues.get(queue.index()).ok_or(OsError::ObjInvalid)
    }

    /// Post to the back of a queue without blocking
    pub fn queue_try_send(&mut self, queue: QueueId, item: OsMsg) -> OsResult<()> {
        self.queue_post(queue, item, false)
    }

    /// Post to the front of a queue without blocking
    pub fn queue_try_send_to_front(&mut self, queue: QueueId, item: OsMsg) -> OsResult<()> {
        self.queue_post(queue, item, true)
    }

    /// Take the oldest item without blocking
    pub fn queue_try_receive(&mut self, queue: QueueId) -> OsResult<OsMsg> {
        self.queue_accept(queue)
    }

    /// Read the oldest item without removing it
    pub fn queue_peek(&self, queue: QueueId) -> OsResult<OsMsg> {
        self.queue_ref(queue)?
            .items
            .front()
            .copied()
            .ok_or(OsError::QEmpty)
    }

    pub fn queue_messages_waiting(&self, queue: QueueId) -> OsResult<usize> {
        Ok(self.queue_ref(queue)?.messages_waiting())
    }

    pub fn queue_spaces_available(&self, queue: QueueId) -> OsResult<usize> {
        Ok(self.queue_ref(queue)?.spaces_available())
    }

    /// Items in the queue, oldest first
    pub fn queue_items(&self, queue: QueueId) -> OsResult<impl Iterator<Item = OsMsg> + '_> {
        Ok(self.queue_ref(queue)?.items.iter().copied())
    }

    /// Discard every stored item
    ///
    /// Blocked senders are admitted into the freed space, oldest priority
    /// order first.
    pub fn queue_reset(&mut self, queue: QueueId) -> OsResult<()> {
        self.queues
            .get_mut(queue.index())
            .ok_or(OsError::ObjInvalid)?
            .items
            .clear();
        while self.queue_admit_sender(queue) {}
        Ok(())
    }

    // ============ Internals ============

    fn queue_post(&mut self, queue: QueueId, item: OsMsg, front: bool) -> OsResult<()> {
        let q = self.queues.get_mut(queue.index()).ok_or(OsError::ObjInvalid)?;

        // A waiting receiver implies an empty queue
        if let Some(rx) = q.recv_waiters.pop() {
            self.wake(rx, Ok(Reply::Item(item)));
            return Ok(());
        }

        if q.is_full() {
            return Err(OsError::QFull);
        }

        q.store(item, front);
        Ok(())
    }

    fn queue_accept(&mut self, queue: QueueId) -> OsResult<OsMsg> {
        let q = self.queues.get_mut(queue.index()).ok_or(OsError::ObjInvalid)?;
        let item = q.items.pop_front().ok_or(OsError::QEmpty)?;
        self.queue_admit_sender(queue);
        Ok(item)
    }

    /// Move the head blocked sender's item into a free slot
    fn queue_admit_sender(&mut self, queue: QueueId) -> bool {
        let q = &mut self.queues[queue.index()];
        if q.is_full() {
            return false;
        }
        let Some(tx) = q.send_waiters.pop() else {
            return false;
        };

        let tcb = &self.tasks[tx.index()];
        q.store(tcb.pend_msg, tcb.pend_front);
        self.wake(tx, Ok(Reply::Done));
        true
    }

    pub(crate) fn queue_send_pend(
        &mut self,
        id: TaskId,
        queue: QueueId,
        item: OsMsg,
        front: bool,
    ) -> Pend {
        match self.queue_post(queue, item, front) {
            Ok(()) => Pend::Done(Reply::Done),
            Err(OsError::QFull) => {
                let tcb = &mut self.tasks[id.index()];
                tcb.pend_msg = item;
                tcb.pend_front = front;
                Pend::Block(OsPendOn::QueueSend(queue))
            }
            Err(err) => Pend::Fail(err),
        }
    }

    pub(crate) fn queue_recv_pend(&mut self, _id: TaskId, queue: QueueId) -> Pend {
        match self.queue_accept(queue) {
            Ok(item) => Pend::Done(Reply::Item(item)),
            Err(OsError::QEmpty) => Pend::Block(OsPendOn::QueueRecv(queue)),
            Err(err) => Pend::Fail(err),
        }
    }
}
