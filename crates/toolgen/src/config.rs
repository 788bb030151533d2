use anyhow::Context as _;
use apimcp_tool_compiler::{CompileOptions, HandlerTarget, UnreferencedParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent defaults for the CLI. Command-line flags win over anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default)]
    pub target: Option<HandlerTarget>,
    #[serde(default)]
    pub unreferenced: Option<UnreferencedParams>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn compile_options(
        &self,
        target: Option<HandlerTarget>,
        unreferenced: Option<UnreferencedParams>,
    ) -> CompileOptions {
        CompileOptions {
            target: target.or(self.target).unwrap_or_default(),
            unreferenced: unreferenced.or(self.unreferenced).unwrap_or_default(),
        }
    }

    pub fn out_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let base = if let Ok(v) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(v)
    } else {
        let home = std::env::var("HOME").context("HOME is not set")?;
        PathBuf::from(home).join(".config")
    };
    Ok(base.join("apimcp").join("toolgen.json"))
}

pub fn load_config(path: &Path) -> anyhow::Result<CliConfig> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CliConfig::default()),
        Err(e) => return Err(e).with_context(|| format!("read config {}", path.display())),
    };
    let cfg: CliConfig =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
