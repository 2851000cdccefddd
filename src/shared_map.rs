//! Parallel writers sharing one [`HashMap`].
//!
//! Each writer upserts the same range of generated keys, so every key is written by every
//! writer; the map itself provides all the synchronization.

use scc::HashMap;
use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::RwLock;
use std::thread;
use tracing::{debug, trace, warn};

#[cfg(feature = "async")]
use std::future::Future;
#[cfg(feature = "async")]
use std::sync::Arc;

/// The map shared among writers.
pub type SharedMap = HashMap<String, usize>;

/// [`WriterConfig`] describes a writer run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriterConfig {
    /// The number of parallel writers.
    pub writers: usize,

    /// The number of keys each writer writes; writer `w` writes [`key_for(i)`](key_for) for
    /// every `i` in `0..keys_per_writer`.
    pub keys_per_writer: usize,
}

/// [`WriteReport`] summarizes a completed writer run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WriteReport {
    /// The number of writers that ran.
    pub writers: usize,

    /// The total number of upserts issued.
    pub writes: usize,

    /// The number of entries in the map after all the writers finished.
    pub distinct_keys: usize,
}

/// [`WriterError`] types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriterError {
    /// Panicked: the writer panicked before finishing.
    Panicked {
        /// The index of the writer.
        writer: usize,
    },
    /// Join: the writer task could not be joined.
    Join {
        /// The index of the writer.
        writer: usize,
    },
    /// Spawn: the thread of the writer could not be spawned; no writer ran.
    Spawn {
        /// The index of the writer.
        writer: usize,
    },
}

impl Default for WriterConfig {
    #[inline]
    fn default() -> Self {
        Self {
            writers: 2,
            keys_per_writer: 1000,
        }
    }
}

impl WriterConfig {
    /// Returns the number of distinct keys a run with this configuration writes.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::WriterConfig;
    ///
    /// assert_eq!(WriterConfig::default().distinct_keys(), 1000);
    /// assert_eq!(WriterConfig { writers: 0, keys_per_writer: 10 }.distinct_keys(), 0);
    /// ```
    #[inline]
    pub fn distinct_keys(&self) -> usize {
        if self.writers == 0 {
            0
        } else {
            self.keys_per_writer
        }
    }

    fn report(&self, map: &SharedMap) -> WriteReport {
        WriteReport {
            writers: self.writers,
            writes: self.writers.saturating_mul(self.keys_per_writer),
            distinct_keys: map.len(),
        }
    }
}

impl Display for WriterError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterError::Panicked { writer } => write!(f, "writer {writer} panicked"),
            WriterError::Join { writer } => write!(f, "writer {writer} could not be joined"),
            WriterError::Spawn { writer } => write!(f, "writer {writer} could not be spawned"),
        }
    }
}

impl Error for WriterError {}

/// Generates the key for the `i`-th write of a writer.
///
/// # Examples
///
/// ```
/// use kway::key_for;
///
/// assert_eq!(key_for(7), "key7");
/// ```
#[inline]
pub fn key_for(i: usize) -> String {
    format!("key{i}")
}

/// Generates the value that `writer` writes for the `i`-th key: `i * 10^writer`, saturating.
///
/// # Examples
///
/// ```
/// use kway::value_for;
///
/// assert_eq!(value_for(0, 7), 7);
/// assert_eq!(value_for(1, 7), 70);
/// assert_eq!(value_for(64, 7), usize::MAX);
/// ```
#[inline]
pub fn value_for(writer: usize, i: usize) -> usize {
    let exp = u32::try_from(writer).unwrap_or(u32::MAX);
    i.saturating_mul(10_usize.saturating_pow(exp))
}

/// Runs the configured writers on scoped threads against `map`.
///
/// The writers are released together once all of them have been spawned. Which writer's value
/// survives for a key is not specified.
///
/// # Errors
///
/// Returns [`WriterError::Panicked`] with the index of the first writer that panicked, or
/// [`WriterError::Spawn`] if a writer thread could not be spawned, in which case the writers
/// that were already spawned exit without writing.
///
/// # Examples
///
/// ```
/// use kway::{run_writers, SharedMap, WriterConfig};
///
/// let map = SharedMap::default();
/// let report = run_writers(&map, &WriterConfig::default()).unwrap();
/// assert_eq!(report.distinct_keys, 1000);
/// assert_eq!(map.len(), 1000);
/// ```
pub fn run_writers(map: &SharedMap, config: &WriterConfig) -> Result<WriteReport, WriterError> {
    run_writers_with(
        map,
        config,
        |writer| Ok(thread::Builder::new().name(format!("writer-{writer}"))),
        |writer, i| {
            map.upsert(key_for(i), value_for(writer, i));
        },
    )
}

/// Runs the configured writers on threads made by `builder`, each calling `write(writer, i)` for
/// its keys.
///
/// The writers wait on `gate` until every thread is spawned; `cancelled` tells them to leave
/// without writing if spawning failed.
pub(crate) fn run_writers_with<B, F>(
    map: &SharedMap,
    config: &WriterConfig,
    builder: B,
    write: F,
) -> Result<WriteReport, WriterError>
where
    B: Fn(usize) -> io::Result<thread::Builder>,
    F: Fn(usize, usize) + Sync,
{
    debug!(
        writers = config.writers,
        keys_per_writer = config.keys_per_writer,
        "starting writers"
    );
    let keys_per_writer = config.keys_per_writer;
    let gate = RwLock::new(());
    let cancelled = AtomicBool::new(false);
    thread::scope(|s| {
        let closed = gate.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut handles = Vec::with_capacity(config.writers);
        let mut spawn_error = None;
        for writer in 0..config.writers {
            let (gate, cancelled, write) = (&gate, &cancelled, &write);
            let spawned = builder(writer).and_then(|b| {
                b.spawn_scoped(s, move || {
                    drop(gate.read());
                    if cancelled.load(Relaxed) {
                        return;
                    }
                    for i in 0..keys_per_writer {
                        write(writer, i);
                    }
                    trace!(writer, "writer finished");
                })
            });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    warn!(writer, %error, "failed to spawn writer");
                    cancelled.store(true, Relaxed);
                    spawn_error = Some(WriterError::Spawn { writer });
                    break;
                }
            }
        }
        drop(closed);

        let mut result = spawn_error.map_or(Ok(()), Err);
        for (writer, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && result.is_ok() {
                result = Err(WriterError::Panicked { writer });
            }
        }
        result
    })?;

    let report = config.report(map);
    debug!(distinct_keys = report.distinct_keys, "writers finished");
    Ok(report)
}

/// Runs the configured writers as tokio tasks against `map`.
///
/// It must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns [`WriterError::Panicked`] if a writer task panicked, or [`WriterError::Join`] if it was
/// cancelled. The remaining writer tasks are aborted and awaited before the error is returned.
///
/// # Examples
///
/// ```
/// use kway::{run_writers_async, SharedMap, WriterConfig};
/// use std::sync::Arc;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let map = Arc::new(SharedMap::default());
/// let report = run_writers_async(map.clone(), &WriterConfig::default()).await.unwrap();
/// assert_eq!(report.distinct_keys, 1000);
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn run_writers_async(
    map: Arc<SharedMap>,
    config: &WriterConfig,
) -> Result<WriteReport, WriterError> {
    run_writers_async_with(map, config, |map, writer, i| async move {
        map.upsert_async(key_for(i), value_for(writer, i)).await;
    })
    .await
}

/// Runs the configured writers as tokio tasks, each awaiting `write(map, writer, i)` for its keys.
#[cfg(feature = "async")]
pub(crate) async fn run_writers_async_with<F, Fut>(
    map: Arc<SharedMap>,
    config: &WriterConfig,
    write: F,
) -> Result<WriteReport, WriterError>
where
    F: Fn(Arc<SharedMap>, usize, usize) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    debug!(
        writers = config.writers,
        keys_per_writer = config.keys_per_writer,
        "starting async writers"
    );
    let keys_per_writer = config.keys_per_writer;
    let tasks: Vec<_> = (0..config.writers)
        .map(|writer| {
            let (map, write) = (map.clone(), write.clone());
            tokio::spawn(async move {
                for i in 0..keys_per_writer {
                    write(map.clone(), writer, i).await;
                }
                trace!(writer, "async writer finished");
            })
        })
        .collect();

    let mut tasks = tasks.into_iter().enumerate();
    while let Some((writer, task)) = tasks.next() {
        if let Err(e) = task.await {
            let remaining: Vec<_> = tasks.map(|(_, task)| task).collect();
            warn!(writer, remaining = remaining.len(), "aborting async writers");
            for task in &remaining {
                task.abort();
            }
            for task in remaining {
                let _ = task.await;
            }
            return Err(if e.is_panic() {
                WriterError::Panicked { writer }
            } else {
                WriterError::Join { writer }
            });
        }
    }

    let report = config.report(&map);
    debug!(distinct_keys = report.distinct_keys, "async writers finished");
    Ok(report)
}

/// Checks that `map` holds exactly the keys of a completed run, each mapped to a value that one of
/// the writers wrote for it.
///
/// # Examples
///
/// ```
/// use kway::{run_writers, verify, SharedMap, WriterConfig};
///
/// let config = WriterConfig { writers: 3, keys_per_writer: 64 };
/// let map = SharedMap::default();
/// run_writers(&map, &config).unwrap();
/// assert!(verify(&map, &config));
/// ```
pub fn verify(map: &SharedMap, config: &WriterConfig) -> bool {
    if map.len() != config.distinct_keys() {
        return false;
    }
    (0..config.distinct_keys()).all(|i| {
        map.read(&key_for(i), |_, v| {
            (0..config.writers).any(|writer| value_for(writer, i) == *v)
        }) == Some(true)
    })
}
