//! Dispatch configuration: forced baseline, disabled capabilities, and
//! per-operation variant preferences (typically written by a profiler).
//!
//! ```json
//! {
//!   "force_generic": false,
//!   "disabled_features": "AVX2",
//!   "kernels": { "byteswap_u32": { "aligned": "a_sse2", "unaligned": "u_sse2" } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::kernel_types::Alignment;
use crate::runtime_detection::CpuFeatures;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "DSP_KERNELS_CONFIG";
/// `1` forces every operation onto its baseline variant.
pub const FORCE_GENERIC_ENV: &str = "DSP_KERNELS_GENERIC";

/// Preferred variant names for one operation, per call-site alignment class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelPreference {
    pub aligned: Option<String>,
    pub unaligned: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub force_generic: bool,
    /// Capabilities treated as absent even if the CPU reports them.
    pub disabled_features: CpuFeatures,
    /// Keyed by operation name.
    pub kernels: BTreeMap<String, KernelPreference>,
}

impl KernelConfig {
    /// `<config dir>/dsp-kernels/kernels.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dsp-kernels").join("kernels.json"))
    }

    pub fn load(path: &Path) -> KernelResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| KernelError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| KernelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded kernel config: {:?}", path);
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults and
    /// an unreadable one is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(KernelError::ConfigIo { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!("No kernel config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring kernel config: {}", e);
                Self::default()
            }
        }
    }

    /// Config from `DSP_KERNELS_CONFIG` or the default path, then
    /// `DSP_KERNELS_GENERIC` on top.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from).or_else(Self::default_path);
        let mut config = match path {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        };
        if let Err(e) = config.validate() {
            log::warn!("Kernel config: {}; unmatched preferences are ignored", e);
        }
        if std::env::var(FORCE_GENERIC_ENV).map(|v| v == "1").unwrap_or(false) {
            log::debug!("{}=1: forcing baseline kernels", FORCE_GENERIC_ENV);
            config.force_generic = true;
        }
        config
    }

    pub fn save(&self, path: &Path) -> KernelResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let io_err = |source| KernelError::ConfigIo { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        log::info!("Saved kernel config: {:?}", path);
        Ok(())
    }

    /// Checks every preference against the operation registry.
    pub fn validate(&self) -> KernelResult<()> {
        for (op_name, pref) in &self.kernels {
            let op = crate::ops::find(op_name)?;
            let descs = op.descriptors();
            for wanted in [&pref.aligned, &pref.unaligned].into_iter().flatten() {
                if !descs.iter().any(|d| d.name == wanted.as_str()) {
                    return Err(KernelError::UnknownVariant { op: op_name.clone(), variant: wanted.clone() });
                }
            }
        }
        Ok(())
    }

    /// Capabilities dispatch may use on a host reporting `detected`.
    pub fn effective_features(&self, detected: CpuFeatures) -> CpuFeatures {
        if self.force_generic {
            CpuFeatures::empty()
        } else {
            detected - self.disabled_features
        }
    }

    pub fn preference(&self, op: &str, alignment: Alignment) -> Option<&str> {
        let pref = self.kernels.get(op)?;
        match alignment {
            Alignment::Aligned => pref.aligned.as_deref(),
            Alignment::Unaligned => pref.unaligned.as_deref(),
        }
    }

    pub fn set_preference(&mut self, op: &str, alignment: Alignment, variant: impl Into<String>) {
        let pref = self.kernels.entry(op.to_string()).or_default();
        let slot = match alignment {
            Alignment::Aligned => &mut pref.aligned,
            Alignment::Unaligned => &mut pref.unaligned,
        };
        *slot = Some(variant.into());
    }
}
