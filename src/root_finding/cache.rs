//! Two-tier best-root cache.
//!
//! Lookups hit an in-memory layer that is lazily populated, once per
//! decimal precision, from a JSON file on disk. Regeneration recomputes
//! every (beam type, mode) pair live with a worker pool, rewrites the
//! file in one atomic replace, and drops the in-memory layer for that
//! precision so the next lookup reloads fresh data.
//!
//! One file per precision; the envelope records the precision and mode
//! range it was built for, so a stale or mismatched file is detected at
//! load time instead of silently serving wrong roots.
//!
//! Known limitation, kept from the reference behavior: two processes
//! regenerating the same precision concurrently race on the file and the
//! last writer wins. There is no cross-process locking.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::{env, fs, thread};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ensemble::find_best_root;
use super::errors::RootfinderError;
use super::report::RootResult;
use crate::beam_types::{BeamType, ALL_BEAM_TYPES};
use crate::numeric::Workspace;

/// Best-root cache errors. All of them are fatal to the lookup that
/// raised them; the remedy for the cache-shaped ones is regeneration.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid mode: {mode}; modes are numbered from 1")]
    InvalidMode { mode: u32 },

    #[error("unable to load the best roots cache at {}: {source}; regenerate it first", path.display())]
    Unavailable { path: PathBuf, source: io::Error },

    #[error("best roots cache at {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("best roots cache at {} holds an unparsable number: {value:?}", path.display())]
    Unparsable { path: PathBuf, value: String },

    #[error("best roots cache at {} was built for {found} decimal digits, expected {expected}", path.display())]
    PrecisionMismatch {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("{beam_type} not found in the best roots cache; regenerate the cache")]
    BeamTypeNotFound { beam_type: BeamType },

    #[error("mode {mode} not found in the best roots cache; regenerate with a larger mode range")]
    ModeNotFound { mode: u32 },

    #[error("unable to persist the best roots cache at {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Rootfinder(#[from] RootfinderError),
}

/// Mode-ordered best roots per beam type id.
type BeamTypeRoots = BTreeMap<u8, Vec<RootResult>>;

/// Cache of the best roots of all characteristic equations.
///
/// `best_root` only ever reads the disk and mutates the in-memory layer;
/// `regenerate` is the only writer of persisted state.
#[derive(Debug)]
pub struct BestRootsCache {
    disk_cache_dir: PathBuf,
    ram_cache: Mutex<HashMap<usize, BeamTypeRoots>>,
}

impl BestRootsCache {
    pub fn new(disk_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            disk_cache_dir: disk_cache_dir.into(),
            ram_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn disk_cache_dir(&self) -> &Path {
        &self.disk_cache_dir
    }

    /// Path of the persisted layer for a decimal precision.
    pub fn cache_file_path(&self, digits: usize) -> PathBuf {
        self.disk_cache_dir.join(format!("best-roots-{digits}.json"))
    }

    /// Looks up the best root of `beam_type` for `mode` at `digits`
    /// decimal digits of precision.
    ///
    /// The first lookup for a precision loads the persisted layer; it is
    /// never computed on the fly here.
    ///
    /// # Errors
    /// - [`CacheError::InvalidMode`]       : `mode` is zero
    /// - [`CacheError::Unavailable`], [`CacheError::Malformed`],
    ///   [`CacheError::Unparsable`], [`CacheError::PrecisionMismatch`] :
    ///   the persisted layer is missing or unusable
    /// - [`CacheError::BeamTypeNotFound`]  : out-of-date cache file
    /// - [`CacheError::ModeNotFound`]      : cache regenerated with a
    ///   smaller mode range than requested
    pub fn best_root(
        &self,
        beam_type: BeamType,
        mode: u32,
        digits: usize,
    ) -> Result<RootResult, CacheError> {
        if mode < 1 {
            return Err(CacheError::InvalidMode { mode });
        }

        let mut ram = self.ram_cache.lock().unwrap_or_else(PoisonError::into_inner);
        let roots = match ram.entry(digits) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.load_disk_cache(digits)?),
        };

        let mode_list = roots
            .get(&beam_type.id())
            .ok_or(CacheError::BeamTypeNotFound { beam_type })?;
        mode_list
            .get((mode - 1) as usize)
            .cloned()
            .ok_or(CacheError::ModeNotFound { mode })
    }

    /// Recomputes and persists the best roots of every registered beam
    /// type for modes `1..=max_mode` at `digits` decimal digits.
    ///
    /// Computation is forced live (the cache is not consulted) and fans
    /// out across a worker pool, one task per mode. The persisted layer
    /// is replaced atomically, then the in-memory layer for `digits` is
    /// dropped so the next lookup reloads it.
    ///
    /// The conventional arguments are [`crate::DEFAULT_MAX_MODE`] and
    /// [`crate::DEFAULT_DECIMAL_PRECISION`].
    pub fn regenerate(&self, max_mode: u32, digits: usize) -> Result<(), CacheError> {
        let mut best_roots = BTreeMap::new();

        for beam_type in ALL_BEAM_TYPES {
            log::info!(
                "regenerating best roots for {beam_type}: {max_mode} modes at {digits} decimal digits"
            );
            let mode_list = best_roots_for_all_modes(beam_type, max_mode, digits)?;
            let stored = mode_list.iter().map(StoredRoot::from_result).collect();
            best_roots.insert(beam_type.id(), stored);
        }

        let file = CacheFile {
            decimal_precision: digits,
            max_mode,
            best_roots,
        };
        self.write_cache_file(&file, digits)?;

        // drop the in-memory layer so the next lookup reloads fresh data
        self.ram_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&digits);

        Ok(())
    }

    fn load_disk_cache(&self, digits: usize) -> Result<BeamTypeRoots, CacheError> {
        let path = self.cache_file_path(digits);

        let raw = fs::read_to_string(&path).map_err(|source| CacheError::Unavailable {
            path: path.clone(),
            source,
        })?;
        let file: CacheFile = serde_json::from_str(&raw).map_err(|source| CacheError::Malformed {
            path: path.clone(),
            source,
        })?;

        if file.decimal_precision != digits {
            return Err(CacheError::PrecisionMismatch {
                path,
                found: file.decimal_precision,
                expected: digits,
            });
        }

        let mut ws = Workspace::new(digits).map_err(RootfinderError::from)?;
        let mut roots = BeamTypeRoots::new();
        for (id, entries) in file.best_roots {
            let mut mode_list = Vec::with_capacity(entries.len());
            for entry in entries {
                mode_list.push(entry.into_result(&mut ws, &path)?);
            }
            roots.insert(id, mode_list);
        }

        Ok(roots)
    }

    fn write_cache_file(&self, file: &CacheFile, digits: usize) -> Result<(), CacheError> {
        let path = self.cache_file_path(digits);

        fs::create_dir_all(&self.disk_cache_dir).map_err(persist_error(&path))?;

        let payload = serde_json::to_string_pretty(file)
            .map_err(|source| io::Error::new(io::ErrorKind::InvalidData, source))
            .map_err(persist_error(&path))?;

        // write-then-rename keeps readers from ever seeing a partial file
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, payload).map_err(persist_error(&path))?;
        fs::rename(&tmp_path, &path).map_err(persist_error(&path))?;

        log::debug!("persisted best roots cache at {}", path.display());
        Ok(())
    }
}

fn persist_error(path: &Path) -> impl FnOnce(io::Error) -> CacheError + '_ {
    move |source| CacheError::Persist {
        path: path.to_path_buf(),
        source,
    }
}

/// Default location of the persisted layer: `~/.beam-roots`.
pub fn default_cache_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".beam-roots")
}

/// Computes the best root of every mode `1..=max_mode` live, fanning out
/// across a scoped worker pool.
///
/// Each worker owns its workspace (the constants cache is not shareable
/// across threads) and pulls modes off a shared atomic counter; results
/// are gathered and reordered by mode before returning, so the output is
/// always mode-ordered and complete.
fn best_roots_for_all_modes(
    beam_type: BeamType,
    max_mode: u32,
    digits: usize,
) -> Result<Vec<RootResult>, RootfinderError> {
    let worker_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(max_mode as usize)
        .max(1);

    let mut workspaces = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        workspaces.push(Workspace::new(digits)?);
    }

    let next_mode = AtomicU32::new(1);
    let mut gathered: Vec<(u32, Result<RootResult, RootfinderError>)> =
        Vec::with_capacity(max_mode as usize);

    thread::scope(|scope| {
        let next_mode = &next_mode;
        let handles: Vec<_> = workspaces
            .iter_mut()
            .map(|ws| {
                scope.spawn(move || {
                    let mut computed = Vec::new();
                    loop {
                        let mode = next_mode.fetch_add(1, Ordering::Relaxed);
                        if mode > max_mode {
                            break;
                        }
                        computed.push((mode, find_best_root(beam_type, mode, ws)));
                    }
                    computed
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(computed) => gathered.extend(computed),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
    });

    gathered.sort_by_key(|(mode, _)| *mode);
    gathered.into_iter().map(|(_, result)| result).collect()
}

/// Persisted envelope: one file per decimal precision.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    decimal_precision: usize,
    max_mode: u32,
    best_roots: BTreeMap<u8, Vec<StoredRoot>>,
}

/// One persisted root. `residual: None` encodes the undefined sentinel
/// of an excluded mode.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRoot {
    root: String,
    residual: Option<String>,
}

impl StoredRoot {
    fn from_result(result: &RootResult) -> Self {
        Self {
            root: result.root().to_string(),
            residual: if result.is_undefined() {
                None
            } else {
                Some(result.residual().to_string())
            },
        }
    }

    fn into_result(self, ws: &mut Workspace, path: &Path) -> Result<RootResult, CacheError> {
        let root = ws.parse_decimal(&self.root);
        if root.is_nan() {
            return Err(CacheError::Unparsable {
                path: path.to_path_buf(),
                value: self.root,
            });
        }

        let residual = match self.residual {
            Some(raw) => {
                let residual = ws.parse_decimal(&raw);
                if residual.is_nan() {
                    return Err(CacheError::Unparsable {
                        path: path.to_path_buf(),
                        value: raw,
                    });
                }
                residual
            }
            None => ws.nan(),
        };

        Ok(RootResult::new(root, residual))
    }
}
