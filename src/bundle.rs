//! The persisted artifact: fitted encoder, tree, label mapping, and the
//! feature order the pipeline expects. One slot on disk, replaced wholesale
//! by every successful training run.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::encoding::{LabelCodec, OneHotEncoder};
use crate::tree::DecisionTree;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub encoder: OneHotEncoder,
    pub tree: DecisionTree,
    pub labels: LabelCodec,
    pub feature_order: Vec<String>,
}

impl ModelBundle {
    /// Serializes the bundle to a unique temp file in the artifact's
    /// directory and renames it into place. A concurrent reader sees either
    /// the previous bundle or this one, never a partial write, and two
    /// concurrent trainers cannot interleave inside one file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .context("creating temp file for model bundle")?;

        let bytes = bincode::serialize(self).context("serializing model bundle")?;
        tmp.write_all(&bytes).context("writing model bundle")?;
        tmp.flush().context("flushing model bundle")?;
        tmp.persist(path)
            .with_context(|| format!("moving model bundle into {}", path.display()))?;
        Ok(())
    }

    /// Loads the current bundle. `Ok(None)` means no model has ever been
    /// trained; actual read or decode failures are real errors.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading model bundle {}", path.display()))
            }
        };
        let bundle = bincode::deserialize(&bytes)
            .with_context(|| format!("decoding model bundle {}", path.display()))?;
        Ok(Some(bundle))
    }
}
