use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::Manifest;
use crate::node::{JsonNode, ParseError, Source, SourceNode, YamlNode};
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infers the document format from the file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot infer the format of {path:?}, expected a .json, .yml or .yaml extension")]
    UnknownFormat { path: PathBuf },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to decode manifest: {0}")]
    DecodeJson(#[from] serde_json::Error),

    #[error("failed to decode manifest: {0}")]
    DecodeYaml(#[from] serde_yaml::Error),
}

/// A parsed document: the raw text plus its span-preserving parse tree.
pub struct Document {
    text: String,
    node: Box<dyn SourceNode>,
}

impl Document {
    pub fn parse(text: String, format: Format) -> Result<Self, ParseError> {
        let node: Box<dyn SourceNode> = match format {
            Format::Json => Box::new(JsonNode::parse(&text)?),
            Format::Yaml => Box::new(YamlNode::parse(&text)?),
        };
        Ok(Self { text, node })
    }

    pub fn node(&self) -> &dyn SourceNode {
        self.node.as_ref()
    }

    pub fn source(&self) -> Source<'_> {
        Source::new(&self.text)
    }
}

/// A manifest together with the document it was decoded from.
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub document: Document,
}

impl LoadedManifest {
    /// Runs source-correlated validation over the decoded manifest.
    pub fn validate(&self) -> Report {
        crate::validation::validate(
            &self.manifest,
            Some(self.document.node()),
            Some(&self.document.source()),
        )
    }
}

/// Reads, decodes, and parses a manifest file. Decoding is lenient (unknown
/// keys survive to validation); only unreadable or syntactically broken
/// documents fail here.
pub fn load_manifest(path: &Path, format: Option<Format>) -> Result<LoadedManifest, LoadError> {
    let format = match format {
        Some(format) => format,
        None => Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
            path: path.to_path_buf(),
        })?,
    };

    debug!("loading manifest from {path:?}");
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest: Manifest = match format {
        Format::Json => serde_json::from_str(&text)?,
        Format::Yaml => serde_yaml::from_str(&text)?,
    };
    let document = Document::parse(text, format)?;
    debug!("parsed {format:?} document with spans");

    Ok(LoadedManifest { manifest, document })
}
