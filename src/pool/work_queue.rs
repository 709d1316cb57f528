// src/pool/work_queue.rs
// =============================================================================
// A fixed-size pool of worker threads fed through a channel.
//
// How it works:
// 1. `new(n)` spawns n threads that all pull from one crossbeam channel
// 2. `execute(task)` bumps the pending counter and sends the task; it never
//    waits for the task to run
// 3. A worker runs the task, logs any error or panic, then decrements the
//    counter and wakes anyone waiting on it
// 4. `finish()` sleeps on a Condvar until the counter is back to zero
// 5. `shutdown()` closes the channel; workers drain what is left and exit
//
// The counter is incremented BEFORE the send, so `finish()` can never observe
// zero while a submitted task is still queued or running.
//
// Rust concepts:
// - Box<dyn FnOnce() + Send>: a heap-allocated closure that can move threads
// - Arc: shared ownership of the counter between the pool and its workers
// - catch_unwind: stops a panicking task from killing its worker thread
// =============================================================================

use crate::error::SearchError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

// A unit of work. Tasks report failure through anyhow so the pool can log it.
type Task = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

// Number of submitted-but-unfinished tasks, plus a Condvar to wait on it
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn increment(&self) {
        *self.count.lock() += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock();
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn wait_for_zero(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.drained.wait(&mut count);
        }
    }
}

/// Fire-and-forget thread pool with a blocking `finish` barrier.
pub struct WorkQueue {
    sender: Mutex<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    pending: Arc<Pending>,
    size: usize,
}

impl WorkQueue {
    /// Default number of worker threads
    pub const DEFAULT_THREADS: usize = 5;

    /// Starts `threads` workers (at least one).
    ///
    /// If a thread cannot be spawned, the ones already started see the
    /// channel close when the sender is dropped and exit on their own.
    pub fn new(threads: usize) -> std::io::Result<Self> {
        let size = threads.max(1);
        let (sender, receiver) = unbounded::<Task>();
        let pending = Arc::new(Pending::default());

        let workers = (0..size)
            .map(|worker_id| {
                let receiver = receiver.clone();
                let pending = Arc::clone(&pending);
                thread::Builder::new()
                    .name(format!("worker-{}", worker_id))
                    .spawn(move || worker_loop(worker_id, receiver, pending))
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            pending,
            size,
        })
    }

    /// How many worker threads this pool was started with
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queues a task and returns immediately.
    ///
    /// Fails only if `shutdown()` has already been called.
    pub fn execute<F>(&self, task: F) -> Result<(), SearchError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let sender = self.sender.lock();
        let sender = sender.as_ref().ok_or(SearchError::QueueClosed)?;

        self.pending.increment();
        if sender.send(Box::new(task)).is_err() {
            // Every receiver is gone, nobody will ever run this task
            self.pending.decrement();
            return Err(SearchError::QueueClosed);
        }
        Ok(())
    }

    /// Blocks until every task submitted so far has finished running.
    pub fn finish(&self) {
        self.pending.wait_for_zero();
    }

    /// Lets workers drain the queue, then joins them. Safe to call twice.
    pub fn shutdown(&self) {
        // Dropping the sender closes the channel once the backlog is empty
        self.sender.lock().take();

        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        for handle in workers {
            if handle.join().is_err() {
                log::error!("a worker thread exited abnormally");
            }
        }
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker_id: usize, receiver: Receiver<Task>, pending: Arc<Pending>) {
    log::debug!("worker {} started", worker_id);

    // recv() fails only when the channel is closed and empty
    while let Ok(task) = receiver.recv() {
        match panic::catch_unwind(AssertUnwindSafe(task)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("worker {}: task failed: {:#}", worker_id, e),
            Err(payload) => log::warn!(
                "worker {}: task panicked: {}",
                worker_id,
                panic_message(payload.as_ref())
            ),
        }
        pending.decrement();
    }

    log::debug!("worker {} exiting", worker_id);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a Condvar instead of joining threads?
//    - finish() has to work many times on the same pool
//    - Joining would end the threads, so it only works once (that is shutdown)
//
// 2. Why crossbeam-channel?
//    - std's mpsc Receiver can't be cloned, so several workers can't share it
//      without an extra Mutex. crossbeam's Receiver is multi-consumer.
//
// 3. Why does the sender live in Mutex<Option<...>>?
//    - shutdown() takes &self and must be able to drop it
//    - take() leaves None behind, so a second shutdown() is a no-op
// -----------------------------------------------------------------------------
