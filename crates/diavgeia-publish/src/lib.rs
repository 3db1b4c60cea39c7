//! Decision publication: everything that happens to a generated N3 document
//! after emission. Appends the decision to the index, writes the document to
//! the configured save directory, hands the uncompressed file to the external
//! triple-store loader, then gzips and removes the original.
//!
//! Every step returns `anyhow::Result` with enough context to locate the
//! failing path or process; retrying is the caller's concern.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use diavgeia_model::Decision;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

// ============================================================================
// Configuration
// ============================================================================

fn default_graph() -> String {
    "default".to_string()
}

/// Publication settings, loaded from a JSON file. `decisions_save_dir`
/// accepts a leading `~` for the invoking user's home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub decisions_save_dir: String,
    pub sparql_endpoint_url: String,
    pub dataset: String,
    #[serde(default = "default_graph")]
    pub graph: String,
    pub loader_executable: String,
    pub index_path: String,
}

impl PublishConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading publish config {}", path.display()))?;
        let config: PublishConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing publish config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_dir(&self) -> PathBuf {
        expand_home(&self.decisions_save_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        expand_home(&self.index_path)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

// ============================================================================
// Decision index
// ============================================================================

/// One index row per published decision, appended as a JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub iun: String,
    pub version: String,
    pub title: String,
    pub date: String,
}

/// Append-only decision index backed by a JSON-lines file.
pub struct DecisionIndex {
    path: PathBuf,
}

impl DecisionIndex {
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn insert(&self, decision: &Decision) -> Result<()> {
        let entry = IndexEntry {
            iun: decision.iun.clone(),
            version: decision.version.clone(),
            title: decision.fields.title.clone().unwrap_or_default(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening decision index {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("appending to decision index {}", self.path.display()))?;
        Ok(())
    }
}

// ============================================================================
// Filesystem sink
// ============================================================================

/// Writes the document to `<save_dir>/<iun>_<version>.n3`, creating the
/// directory first. Returns the written path.
pub fn write_n3(save_dir: &Path, decision: &Decision, document: &str) -> Result<PathBuf> {
    fs::create_dir_all(save_dir)
        .with_context(|| format!("creating save directory {}", save_dir.display()))?;
    let path = save_dir.join(format!("{}_{}.n3", decision.iun, decision.version));
    fs::write(&path, document)
        .with_context(|| format!("writing decision file {}", path.display()))?;
    Ok(path)
}

/// Gzips `path` to a `.gz` sibling and removes the uncompressed file once the
/// encoder has finished. Returns the compressed path.
pub fn compress_and_remove(path: &Path) -> Result<PathBuf> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    let content = fs::read(path)
        .with_context(|| format!("reading decision file {}", path.display()))?;
    let file = File::create(&gz_path)
        .with_context(|| format!("creating compressed file {}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&content)?;
    encoder
        .finish()
        .with_context(|| format!("compressing {}", path.display()))?;
    fs::remove_file(path)
        .with_context(|| format!("removing uncompressed file {}", path.display()))?;
    Ok(gz_path)
}

// ============================================================================
// Loader invocation
// ============================================================================

/// Hands the uncompressed document to the external triple-store loader:
/// `<loader> <endpoint>/<dataset> <graph> <file>`. Returns the loader's
/// stdout; a non-zero exit is an error carrying its stderr.
pub fn run_loader(config: &PublishConfig, file: &Path) -> Result<String> {
    let service = format!("{}/{}", config.sparql_endpoint_url, config.dataset);
    let output = Command::new(&config.loader_executable)
        .arg(&service)
        .arg(&config.graph)
        .arg(file)
        .output()
        .with_context(|| format!("spawning loader {}", config.loader_executable))?;
    if !output.status.success() {
        bail!(
            "loader exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!(file = %file.display(), stdout = %stdout, "loader finished");
    Ok(stdout)
}

// ============================================================================
// Orchestration
// ============================================================================

/// A completed publication: the compressed file on disk and whatever the
/// loader printed (absent for benchmark runs, which skip the loader).
#[derive(Debug)]
pub struct Published {
    pub file: PathBuf,
    pub loader_output: Option<String>,
}

/// Generate and publish one decision: index insert, file write, loader,
/// then compression. Benchmark runs skip the index and the loader and keep
/// only the compressed file, so throughput measurements stay off the store.
pub fn publish(config: &PublishConfig, decision: &Decision) -> Result<Published> {
    let document = diavgeia_emit::generate(decision);
    tracing::info!(iun = %decision.iun, version = %decision.version, "publishing decision");

    if !decision.benchmark {
        DecisionIndex::open(config.index_path()).insert(decision)?;
    }
    let path = write_n3(&config.save_dir(), decision, &document)?;
    let loader_output = if decision.benchmark {
        None
    } else {
        Some(run_loader(config, &path)?)
    };
    let gz_path = compress_and_remove(&path)?;
    tracing::info!(file = %gz_path.display(), "decision published");
    Ok(Published {
        file: gz_path,
        loader_output,
    })
}
