use crate::core::export::parse_name_list;
use crate::core::import::UnknownTokenPolicy;
use crate::utils::error::{JailError, Result};
use crate::utils::validation::{validate_path, Validate, Validation, Violation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STORE_PATH: &str = "./data/softjail.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    pub job: Option<JobInfo>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub export: Vec<ExportConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    pub departments: Option<String>,
    pub prisoners: Option<String>,
    pub officers: Option<String>,
    #[serde(default)]
    pub on_unknown_token: UnknownTokenPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    ByCells,
    Inbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub name: Option<String>,
    pub kind: ExportKind,
    #[serde(default)]
    pub ids: Vec<i32>,
    pub names: Option<String>,
    pub output: Option<String>,
}

impl ExportConfig {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| match self.kind {
            ExportKind::ByCells => "export by-cells".to_string(),
            ExportKind::Inbox => "export inbox".to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl JobsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| JailError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| JailError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn job_name(&self) -> &str {
        self.job.as_ref().map(|j| j.name.as_str()).unwrap_or("jail-etl")
    }
}

impl Validate for JobsConfig {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        validation.check(validate_path("store.path", &self.store.path));

        for (field, path) in [
            ("import.departments", &self.import.departments),
            ("import.prisoners", &self.import.prisoners),
            ("import.officers", &self.import.officers),
        ] {
            if let Some(path) = path {
                validation.check(validate_path(field, path));
            }
        }

        for (index, export) in self.export.iter().enumerate() {
            let field = format!("export[{}]", index);
            match export.kind {
                ExportKind::ByCells if export.ids.is_empty() => {
                    validation.check(Err(Violation::new(
                        format!("{}.ids", field),
                        "by-cells export needs at least one prisoner id",
                    )));
                }
                ExportKind::Inbox
                    if parse_name_list(export.names.as_deref().unwrap_or_default()).is_empty() =>
                {
                    validation.check(Err(Violation::new(
                        format!("{}.names", field),
                        "inbox export needs at least one prisoner name",
                    )));
                }
                _ => {}
            }
            if let Some(output) = &export.output {
                validation.check(validate_path(&format!("{}.output", field), output));
            }
        }

        validation
    }
}
