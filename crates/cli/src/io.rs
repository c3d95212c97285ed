use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use siteplan::shop::Frontage;
use siteplan::{PlanCfg, Polygon};
use std::fs;
use std::path::Path;

/// Input of `cli plan`: one site with its nearby frontage.
#[derive(Debug, Deserialize)]
pub struct SiteInput {
    pub site: Polygon,
    #[serde(default)]
    pub traffic: Vec<Polygon>,
    #[serde(default)]
    pub sub_traffic: Vec<Polygon>,
}

impl SiteInput {
    pub fn frontage(&self) -> Frontage {
        Frontage {
            primary: self.traffic.clone(),
            secondary: self.sub_traffic.clone(),
        }
    }
}

/// Input of `cli subdivide`: parcel groups with one traffic polygon per group.
#[derive(Debug, Deserialize)]
pub struct BlockInput {
    pub groups: Vec<Vec<Polygon>>,
    pub traffic: Vec<Polygon>,
    #[serde(default)]
    pub sub_traffic: Vec<Polygon>,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Config file if given, defaults otherwise.
pub fn load_cfg(path: Option<&Path>) -> Result<PlanCfg> {
    match path {
        Some(p) => read_json(p),
        None => Ok(PlanCfg::default()),
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
