//! Export port for the best agent of a multi-agent run.

use crate::decision::DecisionFunction;
use serde::Serialize;
use std::path::PathBuf;

/// Called once when a session reaches its score ceiling. Persisting the
/// function is up to the implementation.
pub trait ExportPort {
    fn export_best(&mut self, agent: usize, score: u32, function: &dyn DecisionFunction);
}

/// Ignores exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExport;

impl ExportPort for NoExport {
    fn export_best(&mut self, _agent: usize, _score: u32, _function: &dyn DecisionFunction) {}
}

/// One captured export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedAgent {
    pub agent: usize,
    pub score: u32,
    /// The function's serialized form, if it has one.
    pub function: Option<serde_json::Value>,
}

/// Keeps exports in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryExport {
    pub exported: Vec<ExportedAgent>,
}

impl ExportPort for MemoryExport {
    fn export_best(&mut self, agent: usize, score: u32, function: &dyn DecisionFunction) {
        self.exported.push(ExportedAgent {
            agent,
            score,
            function: function.to_json(),
        });
    }
}

/// Writes the exported agent as pretty JSON, replacing the file each time.
#[derive(Debug, Clone)]
pub struct JsonFileExport {
    path: PathBuf,
}

impl JsonFileExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write(&self, exported: &ExportedAgent) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(exported)?;
        std::fs::write(&self.path, json)
    }
}

impl ExportPort for JsonFileExport {
    fn export_best(&mut self, agent: usize, score: u32, function: &dyn DecisionFunction) {
        let exported = ExportedAgent {
            agent,
            score,
            function: function.to_json(),
        };
        match self.write(&exported) {
            Ok(()) => tracing::info!("Exported agent {} (score {}) to {}", agent, score, self.path.display()),
            Err(e) => tracing::error!("Failed to export agent {} to {}: {}", agent, self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{FeedForwardNet, FnDecision};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_memory_export_captures_serialized_network() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let net = FeedForwardNet::random(&[3, 1], &mut rng);
        let mut export = MemoryExport::default();
        export.export_best(4, 22, &net);

        assert_eq!(export.exported.len(), 1);
        assert_eq!(export.exported[0].agent, 4);
        assert_eq!(export.exported[0].score, 22);
        assert!(export.exported[0].function.is_some());
    }

    #[test]
    fn test_closure_exports_without_serialized_form() {
        let mut export = MemoryExport::default();
        export.export_best(0, 1, &FnDecision(|_: &[f64]| 1.0));
        assert!(export.exported[0].function.is_none());
    }

    #[test]
    fn test_json_file_export_writes_network() {
        let path = std::env::temp_dir().join(format!("flappy-export-{}.json", std::process::id()));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let net = FeedForwardNet::random(&[3, 4, 1], &mut rng);

        let mut export = JsonFileExport::new(path.clone());
        export.export_best(2, 22, &net);

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["agent"], 2);
        assert_eq!(value["score"], 22);
        let restored: FeedForwardNet = serde_json::from_value(value["function"].clone()).unwrap();
        assert_eq!(restored.layers().len(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
