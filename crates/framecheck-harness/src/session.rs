//! In-process compute sessions and their fixture lifecycles.
//!
//! A `LocalSession` stands in for a cluster connection: it owns a
//! configuration map and splits frames into partitions. A
//! `PartitionedTable` is the deferred handle a test compares; gathering it
//! back goes through the columnar path when `arrow_enabled` is set and the
//! row path otherwise. Both produce the same frame.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use once_cell::sync::Lazy;
use uuid::Uuid;

use framecheck_core::config::HarnessConfig;
use framecheck_core::error::{Error as CoreError, Result as CoreResult};
use framecheck_core::table::{DataFrame, Materialize, Table};
use framecheck_core::types::{Column, Scalar};

use crate::error::{HarnessError, Result};

/// Conf key toggling columnar transfer when gathering partitions.
pub const CONF_ARROW_ENABLED: &str = "framecheck.sql.execution.arrow.enabled";

#[derive(Debug)]
pub struct LocalSession {
    id: Uuid,
    master: String,
    app_name: String,
    parallelism: usize,
    conf: RwLock<BTreeMap<String, String>>,
    stopped: AtomicBool,
}

impl LocalSession {
    /// Validate `config` and start a session from it.
    pub fn start(config: &HarnessConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let parallelism = config.parallelism()?;
        let mut conf = BTreeMap::new();
        conf.insert(CONF_ARROW_ENABLED.to_string(), config.arrow_enabled.to_string());

        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            master: config.master.clone(),
            app_name: config.app_name.clone(),
            parallelism,
            conf: RwLock::new(conf),
            stopped: AtomicBool::new(false),
        });
        tracing::debug!(
            id = %session.id,
            master = %session.master,
            app = %session.app_name,
            "session started"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn set_conf(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut conf = self.conf.write().unwrap_or_else(|e| e.into_inner());
        conf.insert(key.into(), value.into());
    }

    pub fn conf(&self, key: &str) -> Option<String> {
        let conf = self.conf.read().unwrap_or_else(|e| e.into_inner());
        conf.get(key).cloned()
    }

    pub fn arrow_enabled(&self) -> bool {
        self.conf(CONF_ARROW_ENABLED).as_deref() == Some("true")
    }

    pub fn set_arrow_enabled(&self, enabled: bool) {
        self.set_conf(CONF_ARROW_ENABLED, enabled.to_string());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Idempotent.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!(id = %self.id, "session stopped");
        }
    }

    /// Split `frame` row-wise into at most `parallelism` partitions.
    pub fn parallelize(self: &Arc<Self>, frame: &DataFrame) -> Result<PartitionedTable> {
        if self.is_stopped() {
            return Err(HarnessError::Session(format!("session {} is stopped", self.id)));
        }
        let rows = frame.num_rows();
        let parts = self.parallelism.min(rows).max(1);
        let chunk = (rows + parts - 1) / parts;
        let partitions = if rows == 0 {
            vec![frame.clone()]
        } else {
            (0..rows)
                .step_by(chunk)
                .map(|start| frame.slice_rows(start, (start + chunk).min(rows)))
                .collect()
        };
        tracing::trace!(id = %self.id, rows, partitions = partitions.len(), "parallelized frame");
        Ok(PartitionedTable {
            session: Arc::clone(self),
            partitions,
        })
    }
}

/// A frame spread over a session's partitions.
#[derive(Debug, Clone)]
pub struct PartitionedTable {
    session: Arc<LocalSession>,
    partitions: Vec<DataFrame>,
}

impl PartitionedTable {
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[DataFrame] {
        &self.partitions
    }

    pub fn session(&self) -> &Arc<LocalSession> {
        &self.session
    }

    /// Gather every partition into one local frame.
    pub fn collect(&self) -> CoreResult<DataFrame> {
        if self.session.is_stopped() {
            return Err(CoreError::Materialize(format!(
                "session {} is stopped",
                self.session.id()
            )));
        }
        let columnar = self.session.arrow_enabled();
        tracing::debug!(
            id = %self.session.id(),
            partitions = self.partitions.len(),
            columnar,
            "gathering partitioned table"
        );
        if !columnar {
            return gather_rows(&self.partitions);
        }
        gather_columns(&self.partitions).or_else(|e| {
            tracing::debug!(error = %e, "columnar gather failed, falling back to rows");
            gather_rows(&self.partitions)
        })
    }
}

impl Materialize for PartitionedTable {
    fn to_local_table(&self) -> CoreResult<Table> {
        self.collect().map(Table::Frame)
    }
}

/// Columnar gather: whole column vectors are appended per partition.
fn gather_columns(partitions: &[DataFrame]) -> CoreResult<DataFrame> {
    let (first, rest) = split_first(partitions)?;
    let mut index = first.index.clone();
    let mut columns: Vec<Column> = first
        .columns
        .iter()
        .map(|c| Column::new(c.name.clone(), c.data_type, Vec::new()))
        .collect();
    for part in std::iter::once(first).chain(rest) {
        let part = columnar_copy(part)?;
        for (acc, col) in columns.iter_mut().zip(part.columns) {
            acc.values.extend(col.values);
        }
    }
    for part in rest {
        index.append(&part.index)?;
    }
    assemble(first, columns, index)
}

/// Row gather: cells are copied one row at a time.
fn gather_rows(partitions: &[DataFrame]) -> CoreResult<DataFrame> {
    let (first, rest) = split_first(partitions)?;
    let mut index = first.index.clone();
    let mut cells: Vec<Vec<Scalar>> = vec![Vec::new(); first.num_columns()];
    for part in std::iter::once(first).chain(rest) {
        for row in 0..part.num_rows() {
            for (acc, col) in cells.iter_mut().zip(&part.columns) {
                acc.push(col.values[row].clone());
            }
        }
    }
    for part in rest {
        index.append(&part.index)?;
    }
    let columns = first
        .columns
        .iter()
        .zip(cells)
        .map(|(c, values)| Column::new(c.name.clone(), c.data_type, values))
        .collect();
    assemble(first, columns, index)
}

fn split_first(partitions: &[DataFrame]) -> CoreResult<(&DataFrame, &[DataFrame])> {
    partitions
        .split_first()
        .ok_or_else(|| CoreError::Materialize("partitioned table has no partitions".into()))
}

fn assemble(
    template: &DataFrame,
    columns: Vec<Column>,
    index: framecheck_core::table::Index,
) -> CoreResult<DataFrame> {
    let mut frame = DataFrame::new(columns)?.with_index(index)?;
    frame.columns_name = template.columns_name.clone();
    Ok(frame)
}

/// Partition contents after a trip through Arrow record batches.
#[cfg(feature = "arrow")]
fn columnar_copy(part: &DataFrame) -> CoreResult<DataFrame> {
    use framecheck_core::arrow::{frame_to_record_batch, record_batch_to_frame};
    let batch = frame_to_record_batch(part)?;
    record_batch_to_frame(&batch)
}

#[cfg(not(feature = "arrow"))]
fn columnar_copy(part: &DataFrame) -> CoreResult<DataFrame> {
    Ok(part.clone())
}

static DEFAULT_SESSION: Lazy<Mutex<Option<Arc<LocalSession>>>> = Lazy::new(|| Mutex::new(None));

/// The process-wide shared session, started on first use. Later calls return
/// the same session until `stop_default_session`.
pub fn default_session(config: &HarnessConfig) -> Result<Arc<LocalSession>> {
    let mut slot = DEFAULT_SESSION.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(session) = slot.as_ref().filter(|s| !s.is_stopped()) {
        return Ok(Arc::clone(session));
    }
    let session = LocalSession::start(config)?;
    *slot = Some(Arc::clone(&session));
    Ok(session)
}

pub fn stop_default_session() {
    let mut slot = DEFAULT_SESSION.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(session) = slot.take() {
        session.stop();
    }
}

/// Who owns a fixture's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// A fresh session per fixture, stopped at teardown.
    Owned,
    /// The process-wide default session; never stopped by a fixture.
    Shared,
}

/// Session setup/teardown for one test or one group of tests.
#[derive(Debug)]
pub struct SessionFixture {
    session: Arc<LocalSession>,
    lifecycle: Lifecycle,
}

impl SessionFixture {
    pub fn setup(lifecycle: Lifecycle, config: &HarnessConfig) -> Result<Self> {
        let session = match lifecycle {
            Lifecycle::Owned => LocalSession::start(config)?,
            Lifecycle::Shared => {
                let session = default_session(config)?;
                session.set_arrow_enabled(config.arrow_enabled);
                session
            }
        };
        Ok(Self { session, lifecycle })
    }

    /// Extra conf entry on the fixture's session.
    pub fn with_conf(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.session.set_conf(key, value);
        self
    }

    pub fn session(&self) -> &Arc<LocalSession> {
        &self.session
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Explicit teardown; dropping the fixture does the same.
    pub fn teardown(self) {}
}

impl Drop for SessionFixture {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Owned {
            self.session.stop();
        }
    }
}
