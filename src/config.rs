//! # Generator Configuration
//!
//! Every constant that ends up in the generated Terraform. The defaults
//! produce the stock output; a JSON file can override any subset.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Amazon Linux 2 in us-east-1.
pub const DEFAULT_AMI: &str = "ami-0c55b159cbfafe1f0";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An extra tag appended to every tag map after `Name` and `GeneratedBy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub provider_source: String,
    pub provider_version: String,
    pub region: String,
    pub availability_zone: String,
    pub ami: String,
    pub instance_type: String,
    pub vpc_cidr: String,
    pub subnet_cidr: String,
    /// Value of the `GeneratedBy` tag.
    pub generated_by: String,
    pub extra_tags: Vec<Tag>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider_source: "hashicorp/aws".to_string(),
            provider_version: "~> 5.0".to_string(),
            region: "us-east-1".to_string(),
            availability_zone: "us-east-1a".to_string(),
            ami: DEFAULT_AMI.to_string(),
            instance_type: "t2.micro".to_string(),
            vpc_cidr: "10.0.0.0/16".to_string(),
            subnet_cidr: "10.0.1.0/24".to_string(),
            generated_by: "InfraCrafter.com".to_string(),
            extra_tags: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = zone.into();
        self
    }

    pub fn with_ami(mut self, ami: impl Into<String>) -> Self {
        self.ami = ami.into();
        self
    }

    pub fn with_generated_by(mut self, tool: impl Into<String>) -> Self {
        self.generated_by = tool.into();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_tags.push(Tag {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}
