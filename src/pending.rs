use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::error::Error;
use crate::message::Message;

/// One-shot completion slot for a request in flight.
pub(crate) type ReplySlot = oneshot::Sender<Result<Message, Error>>;

/// In-flight bookkeeping for the multiplexer task.
///
/// Owned exclusively by that task; ids are allocated with a wrapping
/// increment and are only unique while fewer than 2^32 requests are
/// outstanding. A collision trips a debug assertion; release builds
/// overwrite the stale slot, whose waiter then observes a closed channel.
pub(crate) struct RequestTable {
    next_id: u32,
    pending: HashMap<u32, ReplySlot>,
}

impl RequestTable {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Register the slot before the request bytes are flushed, so a reply
    /// racing the write still finds its waiter.
    pub(crate) fn submit(&mut self, id: u32, slot: ReplySlot) {
        let stale = self.pending.insert(id, slot);
        debug_assert!(stale.is_none(), "request id {id} already in flight");
    }

    pub(crate) fn route(&mut self, id: u32) -> Option<ReplySlot> {
        self.pending.remove(&id)
    }

    pub(crate) fn fail(&mut self, id: u32, error: Error) {
        if let Some(slot) = self.pending.remove(&id) {
            let _ = slot.send(Err(error));
        }
    }

    /// Drain every pending waiter, failing each with `cause`.
    pub(crate) fn close(&mut self, cause: impl Fn() -> Error) {
        for (_, slot) in self.pending.drain() {
            let _ = slot.send(Err(cause()));
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pending.len()
    }
}
