use serde::Deserialize;

use crate::report::{Entry, Report};
use crate::schema::{ConfigValue, Field, Shape, Validate};


pub const SUPPORTED_VERSION: u32 = 1;

/// A deployment manifest. Decoding is deliberately lenient: missing fields
/// take defaults and unknown keys are kept out of serde's way, so the
/// validator can report them with document positions instead of a decode
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: u32,

    #[serde(flatten)]
    pub metadata: Metadata,

    #[serde(default)]
    pub service: Service,

    #[serde(default)]
    pub storage: Option<Storage>,

    #[serde(default)]
    pub network: Option<Network>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,

    pub image: String,

    pub replicas: Replicas,

    pub ports: Vec<Port>,

    pub resources: Option<Resources>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct Replicas(pub u32);

impl Default for Replicas {
    fn default() -> Self {
        Self(1)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(transparent)]
pub struct Port(pub u32);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub cpu: Option<String>,

    pub memory: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub disks: Vec<Disk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Disk {
    pub device: String,

    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Network {
    pub hostname: Option<String>,

    pub dns: Vec<String>,
}

const KNOWN_FORMATS: &[&str] = &["ext4", "xfs", "btrfs", "ext3"];

impl ConfigValue for Manifest {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("version", &self.version),
            Field::embedded(&self.metadata),
            Field::new("service", &self.service),
            Field::new("storage", &self.storage),
            Field::new("network", &self.network),
        ])
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.version != SUPPORTED_VERSION {
            report.add(Entry::error(format!(
                "unsupported manifest version: {}",
                self.version
            )));
            return report;
        }
        if !self.service.ports.is_empty() && self.network.is_none() {
            report.add(Entry::warning(
                "ports are declared but networking is not configured",
            ));
        }
        report
    }
}

impl ConfigValue for Metadata {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("name", &self.name),
            Field::new("description", &self.description),
        ])
    }
}

impl ConfigValue for Service {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("name", &self.name),
            Field::new("image", &self.image),
            Field::new("replicas", &self.replicas),
            Field::new("ports", &self.ports),
            Field::new("resources", &self.resources),
        ])
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Service {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.name.is_empty() {
            report.add(Entry::error("service name must not be empty"));
        }
        if self.image.is_empty() {
            report.add(Entry::error("service image must not be empty"));
        } else if !self.image.contains(':') {
            report.add(Entry::warning(format!(
                "image {} has no explicit tag",
                self.image
            )));
        }
        report
    }
}

impl ConfigValue for Replicas {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Replicas {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.0 == 0 {
            report.add(Entry::error("replicas must be at least 1"));
        } else if self.0 > 512 {
            report.add(Entry::warning(format!(
                "replicas {} exceeds the supported maximum of 512",
                self.0
            )));
        }
        report
    }
}

impl ConfigValue for Port {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Port {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.0 == 0 || self.0 > 65535 {
            report.add(Entry::error(format!("port {} is out of range", self.0)));
        }
        report
    }
}

impl ConfigValue for Resources {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("cpu", &self.cpu),
            Field::new("memory", &self.memory),
        ])
    }
}

impl ConfigValue for Storage {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![Field::new("disks", &self.disks)])
    }
}

impl ConfigValue for Disk {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("device", &self.device),
            Field::new("format", &self.format),
        ])
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Disk {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if !self.device.starts_with('/') {
            report.add(Entry::error(format!(
                "device must be an absolute path: {}",
                self.device
            )));
        }
        if let Some(format) = &self.format {
            if format == "ext3" {
                report.add(Entry::deprecation("ext3 is deprecated, use ext4 instead"));
            } else if !KNOWN_FORMATS.contains(&format.as_str()) {
                report.add(Entry::warning(format!(
                    "unknown filesystem format: {format}"
                )));
            }
        }
        report
    }
}

impl ConfigValue for Network {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("hostname", &self.hostname),
            Field::new("dns", &self.dns),
        ])
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Network {
    fn validate(&self) -> Report {
        let mut report = Report::new();
        if self.dns.len() > 3 {
            report.add(Entry::warning(
                "only the first 3 dns servers will be used",
            ));
        }
        report
    }
}
