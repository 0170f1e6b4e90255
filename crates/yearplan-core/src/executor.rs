//! Where commands run.
//!
//! [`Inline`] runs each command during `submit`, which suits exports and
//! tests. [`Worker`] hands commands to a background thread so the UI loop
//! never waits on the network; completions are collected with `poll`.

use crate::backend::Backend;
use crate::command::{Command, Completion, Outcome, Ticket};
use crate::error::YearPlanError;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

pub trait Executor {
    fn submit(&mut self, ticket: Ticket, command: Command);
    /// Completions finished since the last call. Never blocks.
    fn poll(&mut self) -> Vec<Completion>;
}

/// Runs commands synchronously on the caller's thread.
pub struct Inline<B> {
    backend: B,
    done: Vec<Completion>,
}

impl<B: Backend> Inline<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            done: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Backend> Executor for Inline<B> {
    fn submit(&mut self, ticket: Ticket, command: Command) {
        let outcome = command.run(&self.backend);
        self.done.push(Completion {
            ticket,
            command,
            outcome,
        });
    }

    fn poll(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.done)
    }
}

/// Runs commands in submission order on one background thread.
pub struct Worker {
    requests: Option<Sender<(Ticket, Command)>>,
    completions: Receiver<Completion>,
    handle: Option<JoinHandle<()>>,
    /// Submissions that could not reach the thread.
    orphaned: Vec<Completion>,
}

impl Worker {
    pub fn spawn<B: Backend + Send + 'static>(backend: B) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<(Ticket, Command)>();
        let (done_tx, done_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("yearplan-worker".into())
            .spawn(move || {
                for (ticket, command) in request_rx {
                    let outcome = command.run(&backend);
                    let completion = Completion {
                        ticket,
                        command,
                        outcome,
                    };
                    if done_tx.send(completion).is_err() {
                        break;
                    }
                }
            });

        let (requests, handle) = match handle {
            Ok(handle) => (Some(request_tx), Some(handle)),
            Err(err) => {
                log::error!("failed to spawn worker thread: {}", err);
                (None, None)
            }
        };

        Self {
            requests,
            completions: done_rx,
            handle,
            orphaned: Vec::new(),
        }
    }
}

impl Executor for Worker {
    fn submit(&mut self, ticket: Ticket, command: Command) {
        let Some(tx) = &self.requests else {
            self.orphaned.push(unavailable(ticket, command));
            return;
        };
        if let Err(mpsc::SendError((ticket, command))) = tx.send((ticket, command)) {
            self.orphaned.push(unavailable(ticket, command));
        }
    }

    fn poll(&mut self) -> Vec<Completion> {
        let mut out = std::mem::take(&mut self.orphaned);
        loop {
            match self.completions.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop after in-flight work.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn unavailable(ticket: Ticket, command: Command) -> Completion {
    Completion {
        ticket,
        command,
        outcome: Outcome::Failed(YearPlanError::Unavailable("worker thread is not running".into())),
    }
}
