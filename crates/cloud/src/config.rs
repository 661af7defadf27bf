//! Cloud sink configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CloudError;
use crate::wire::MonitoredResource;

pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
pub const SERVICE_ENV: &str = "GAE_SERVICE";
pub const VERSION_ENV: &str = "GAE_VERSION";

/// Where entries go and which resource they are attributed to.
///
/// Every field is required; there are no defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Project id, e.g. `my-project`.
    pub project: String,
    /// Service (module) name.
    pub service: String,
    /// Deployed version.
    pub version: String,
    /// Monitored resource type, e.g. `gae_app`.
    pub resource_type: String,
    /// Log id entries are written under, e.g. `app_logs`.
    pub log_name: String,
}

impl CloudConfig {
    pub fn new(
        project: impl Into<String>,
        service: impl Into<String>,
        version: impl Into<String>,
        resource_type: impl Into<String>,
        log_name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            service: service.into(),
            version: version.into(),
            resource_type: resource_type.into(),
            log_name: log_name.into(),
        }
    }

    /// Project, service and version from the App Engine environment
    /// (`GOOGLE_CLOUD_PROJECT`, `GAE_SERVICE`, `GAE_VERSION`).
    pub fn from_env(
        resource_type: impl Into<String>,
        log_name: impl Into<String>,
    ) -> Result<Self, CloudError> {
        Self::from_lookup(|key| std::env::var(key).ok(), resource_type, log_name)
    }

    /// Like [`CloudConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(
        lookup: F,
        resource_type: impl Into<String>,
        log_name: impl Into<String>,
    ) -> Result<Self, CloudError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).ok_or(CloudError::MissingEnv(key));
        let config = Self::new(
            var(PROJECT_ENV)?,
            var(SERVICE_ENV)?,
            var(VERSION_ENV)?,
            resource_type,
            log_name,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CloudError> {
        let required = [
            ("project", &self.project),
            ("service", &self.service),
            ("version", &self.version),
            ("resource_type", &self.resource_type),
            ("log_name", &self.log_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CloudError::config(format!("{name} is required")));
            }
        }

        let log_name_ok = self
            .log_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.'));
        if !log_name_ok {
            return Err(CloudError::config(format!(
                "log_name {:?} may only contain letters, digits, '/', '_', '-' and '.'",
                self.log_name
            )));
        }
        Ok(())
    }

    /// `projects/{project}/logs/{log_name}`
    pub fn log_path(&self) -> String {
        format!("projects/{}/logs/{}", self.project, self.log_name)
    }

    /// `projects/{project}/traces/{trace_id}`
    pub fn trace_path(&self, trace_id: &str) -> String {
        format!("projects/{}/traces/{}", self.project, trace_id)
    }

    pub fn resource(&self) -> MonitoredResource {
        let labels = BTreeMap::from([
            ("module_id".to_string(), self.service.clone()),
            ("project_id".to_string(), self.project.clone()),
            ("version_id".to_string(), self.version.clone()),
        ]);
        MonitoredResource {
            kind: self.resource_type.clone(),
            labels,
        }
    }
}
