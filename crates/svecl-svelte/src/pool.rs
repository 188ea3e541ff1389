//! Bounded pool of component compilers.
//!
//! Script engines cannot move between threads, so every pooled compiler
//! lives on its own worker thread and is driven through a job channel. The
//! pool hands out exclusive access to one worker at a time; callers block
//! while all workers are checked out.

use crate::assets::CompilerSource;
use crate::compiler::{CompileResult, ComponentCompiler};
use crate::error::SvelteError;
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::thread;

/// Stack size for compiler threads. Parsing a full compiler bundle recurses
/// deeply.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

type Reply = Result<CompileResult, SvelteError>;

/// Work item sent to a compiler thread
struct CompileJob {
    source: String,
    filename: String,
    reply: Sender<Reply>,
}

/// Handle to one compiler thread
struct CompilerSlot {
    id: usize,
    jobs: Sender<CompileJob>,
}

/// Fixed-size pool of ready compilers
pub struct CompilerPool {
    /// Slots not currently checked out
    free: Mutex<VecDeque<CompilerSlot>>,
    /// Signalled whenever a slot is returned
    available: Condvar,
    capacity: usize,
    version: String,
    source: CompilerSource,
}

impl CompilerPool {
    /// Start `size` compilers loading from `source`.
    ///
    /// If `size` is 0, defaults to the number of CPU cores. All compilers
    /// initialize in parallel; the call returns once every one of them has
    /// reported, and fails if any of them could not start.
    pub fn new(size: usize, source: CompilerSource) -> Result<Self, SvelteError> {
        let capacity = if size == 0 { num_cpus::get() } else { size };
        let (ready_tx, ready_rx) = channel::bounded(capacity);
        let mut slots = VecDeque::with_capacity(capacity);

        for id in 0..capacity {
            let (jobs_tx, jobs_rx) = channel::unbounded();
            let ready = ready_tx.clone();
            let worker_source = source.clone();

            thread::Builder::new()
                .name(format!("svecl-compiler-{}", id))
                .stack_size(WORKER_STACK_SIZE)
                .spawn(move || run_worker(id, worker_source, ready, jobs_rx))
                .map_err(|e| SvelteError::Bootstrap {
                    script: source.to_string(),
                    reason: format!("unable to spawn compiler thread: {}", e),
                })?;

            slots.push_back(CompilerSlot { id, jobs: jobs_tx });
        }
        drop(ready_tx);

        let mut version = None;
        let mut failure = None;
        let mut reported = 0;
        while let Ok((id, outcome)) = ready_rx.recv() {
            reported += 1;
            match outcome {
                Ok(v) => {
                    version.get_or_insert(v);
                }
                Err(e) => {
                    tracing::debug!(worker = id, error = %e, "compiler failed to start");
                    failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        let version = match version {
            Some(v) if reported == capacity => v,
            _ => {
                return Err(SvelteError::Bootstrap {
                    script: source.to_string(),
                    reason: "compiler thread exited during startup".to_string(),
                })
            }
        };

        tracing::info!(
            size = capacity,
            compiler = %source,
            version = %version,
            "compiler pool ready"
        );
        Ok(Self {
            free: Mutex::new(slots),
            available: Condvar::new(),
            capacity,
            version,
            source,
        })
    }

    /// Check out a compiler, blocking until one is free.
    ///
    /// The compiler goes back to the pool when the returned guard is dropped.
    pub fn acquire(&self) -> PooledCompiler<'_> {
        let mut free = self.free.lock();
        loop {
            if let Some(slot) = free.pop_front() {
                return PooledCompiler {
                    pool: self,
                    slot: Some(slot),
                };
            }
            self.available.wait(&mut free);
        }
    }

    /// Check out a compiler if one is free right now.
    pub fn try_acquire(&self) -> Option<PooledCompiler<'_>> {
        self.free.lock().pop_front().map(|slot| PooledCompiler {
            pool: self,
            slot: Some(slot),
        })
    }

    fn release(&self, slot: CompilerSlot) {
        self.free.lock().push_back(slot);
        self.available.notify_one();
    }

    /// Compile on whichever compiler frees up first.
    pub fn compile(&self, source: &str, filename: &str) -> Result<CompileResult, SvelteError> {
        self.acquire().compile(source, filename)
    }

    /// Number of compilers in the pool
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of compilers not checked out
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Version reported by the loaded compiler
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Where the compiler script was loaded from
    pub fn source(&self) -> &CompilerSource {
        &self.source
    }
}

/// Exclusive access to one pooled compiler.
///
/// Returned to the pool on drop, including during unwinding.
pub struct PooledCompiler<'a> {
    pool: &'a CompilerPool,
    slot: Option<CompilerSlot>,
}

impl PooledCompiler<'_> {
    fn slot(&self) -> &CompilerSlot {
        self.slot.as_ref().expect("slot is held until the guard is dropped")
    }

    /// Index of the underlying compiler within its pool
    pub fn id(&self) -> usize {
        self.slot().id
    }

    /// Compile a component on this compiler.
    pub fn compile(&mut self, source: &str, filename: &str) -> Result<CompileResult, SvelteError> {
        let slot = self.slot();
        let (reply, response) = channel::bounded(1);
        let job = CompileJob {
            source: source.to_string(),
            filename: filename.to_string(),
            reply,
        };

        slot.jobs
            .send(job)
            .map_err(|_| SvelteError::WorkerLost(slot.id))?;
        response.recv().map_err(|_| {
            tracing::warn!(worker = slot.id, filename, "compiler worker died during compilation");
            SvelteError::WorkerLost(slot.id)
        })?
    }

    /// Return the compiler to the pool.
    pub fn release(self) {}
}

impl Drop for PooledCompiler<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.pool.release(slot);
        }
    }
}

fn run_worker(
    id: usize,
    source: CompilerSource,
    ready: Sender<(usize, Result<String, SvelteError>)>,
    jobs: Receiver<CompileJob>,
) {
    let started = ComponentCompiler::new(&source).and_then(|mut compiler| {
        let version = compiler.version()?;
        Ok((compiler, version))
    });

    let mut compiler = match started {
        Ok((compiler, version)) => {
            let _ = ready.send((id, Ok(version)));
            compiler
        }
        Err(e) => {
            let _ = ready.send((id, Err(e)));
            return;
        }
    };
    drop(ready);

    for job in jobs.iter() {
        tracing::debug!(worker = id, filename = %job.filename, "compiling component");
        let result = compiler.compile(&job.source, &job.filename);
        let _ = job.reply.send(result);
    }

    tracing::debug!(worker = id, "compiler worker stopped");
}
