//! Serialization of edit commands from any number of input sources.
//!
//! Input sources may live on different threads (a terminal reader, a test
//! driver, a pointer handler). They all push through a [`CommandSender`];
//! a single consumer owns the [`EditBuffer`] and applies commands in the
//! order they arrived, so every command still runs to completion before the
//! next one starts.

use std::ops::ControlFlow;

use flume::{Receiver, Sender};
use thiserror::Error;

use crate::display::TextSink;
use crate::editor::{Command, EditBuffer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("command queue is closed")]
pub struct QueueClosed;

/// Producer handle for a [`CommandQueue`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CommandSender {
    sender: Sender<Vec<Command>>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<(), QueueClosed> {
        self.send_batch(vec![command])
    }

    /// Send several commands that are applied back to back, with no render
    /// in between.
    pub fn send_batch(&self, commands: Vec<Command>) -> Result<(), QueueClosed> {
        if commands.is_empty() {
            return Ok(());
        }
        self.sender.send(commands).map_err(|_| QueueClosed)
    }
}

/// A multi-producer, single-consumer queue of edit commands.
#[derive(Debug)]
pub struct CommandQueue {
    sender: Sender<Vec<Command>>,
    receiver: Receiver<Vec<Command>>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            sender: self.sender.clone(),
        }
    }

    /// Number of batches waiting to be applied.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Apply everything queued so far without waiting for more.
    ///
    /// Returns the number of commands applied.
    pub fn drain<E: TextSink, R: TextSink>(&self, buffer: &mut EditBuffer<E, R>) -> usize {
        self.receiver
            .try_iter()
            .map(|batch| apply_batch(buffer, batch))
            .sum()
    }

    /// Apply commands until every sender has been dropped or `on_idle`
    /// breaks.
    ///
    /// `on_idle` runs whenever the queue has just been emptied, which is when
    /// the display is worth refreshing. The queue is closed on return, so
    /// producers see [`QueueClosed`] on their next send. Returns the number
    /// of commands applied.
    pub fn run<E, R, F>(self, buffer: &mut EditBuffer<E, R>, mut on_idle: F) -> usize
    where
        E: TextSink,
        R: TextSink,
        F: FnMut(&EditBuffer<E, R>) -> ControlFlow<()>,
    {
        let Self { sender, receiver } = self;
        drop(sender);

        let mut applied = 0;
        while let Ok(batch) = receiver.recv() {
            applied += apply_batch(buffer, batch);
            if receiver.is_empty() && on_idle(buffer).is_break() {
                tracing::debug!(applied, "command consumer stopped");
                return applied;
            }
        }

        tracing::debug!(applied, "command queue closed");
        applied
    }
}

fn apply_batch<E, R>(buffer: &mut EditBuffer<E, R>, batch: Vec<Command>) -> usize
where
    E: TextSink,
    R: TextSink,
{
    let count = batch.len();
    for command in batch {
        buffer.apply(command);
    }
    count
}
