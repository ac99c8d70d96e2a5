//! Distribution configuration loaded from `dist.toml`.
//!
//! The file is parsed once at start-up into a [`DistConfig`] that is passed
//! by reference to every later step. Relative paths inside it are resolved
//! against the directory holding the file. Unknown keys are rejected so
//! typos surface immediately instead of silently falling back to defaults.
//!
//! ```toml
//! [metadata]
//! name = "fmipp"
//! version = "1.3"
//! long_description_file = "README.txt"
//!
//! [distribution]
//! packages = ["fmipp", "fmipp.export"]
//! platform_tag = "win_amd64"
//!
//! [package_data]
//! fmipp = ["lib/fmippim.dll", "licenses/FMIPP_LICENSE.txt"]
//! ```

use crate::dist::manifest::{DeclaredArtifact, MissingArtifactPolicy};
use crate::dist::package_name::PackageName;
use crate::dist::relative_path::RelativePath;
use crate::dist::tag::{DEFAULT_ABI_TAG, DEFAULT_PYTHON_TAG, PlatformTag, WheelTag};
use crate::error::{PackagerError, Result};
use crate::metadata::PackageMetadata;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, io};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "dist.toml";

/// The complete packaging configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DistConfig {
    /// Public package metadata.
    pub metadata: MetadataSection,
    /// Packages, tags, and output locations.
    pub distribution: DistributionSection,
    /// Non-source files attached to each package, relative to its directory.
    #[serde(default)]
    pub package_data: BTreeMap<PackageName, Vec<RelativePath>>,
    #[serde(skip)]
    base_dir: Utf8PathBuf,
}

/// The `[metadata]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetadataSection {
    /// Distribution name.
    pub name: String,
    /// Distribution version.
    pub version: String,
    /// One-line summary.
    #[serde(default)]
    pub description: String,
    /// Document holding the long description.
    pub long_description_file: Utf8PathBuf,
    /// Project home page.
    #[serde(default)]
    pub url: String,
    /// Maintainer name.
    #[serde(default)]
    pub maintainer: String,
    /// Maintainer e-mail address.
    #[serde(default)]
    pub maintainer_email: String,
    /// Licence summary.
    #[serde(default)]
    pub license: String,
    /// Supported platforms, for example `Windows`.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Trove classifiers.
    #[serde(default)]
    pub classifiers: Vec<String>,
}

/// The `[distribution]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DistributionSection {
    /// Logical packages shipped in the distribution.
    pub packages: Vec<PackageName>,
    /// Python component of the compatibility tag.
    #[serde(default = "DistributionSection::default_python_tag")]
    pub python_tag: String,
    /// ABI component of the compatibility tag.
    #[serde(default = "DistributionSection::default_abi_tag")]
    pub abi_tag: String,
    /// Platform component of the compatibility tag.
    pub platform_tag: PlatformTag,
    /// What to do when a declared artifact is missing.
    #[serde(default)]
    pub missing_artifacts: MissingArtifactPolicy,
    /// Root that package directories are resolved in.
    #[serde(default)]
    pub source_root: Option<Utf8PathBuf>,
    /// Output directory for archives.
    #[serde(default = "DistributionSection::default_dist_dir")]
    pub dist_dir: Utf8PathBuf,
    /// Output directory for the staged build tree.
    #[serde(default = "DistributionSection::default_build_dir")]
    pub build_dir: Utf8PathBuf,
}

impl DistributionSection {
    fn default_python_tag() -> String {
        DEFAULT_PYTHON_TAG.to_owned()
    }

    fn default_abi_tag() -> String {
        DEFAULT_ABI_TAG.to_owned()
    }

    fn default_dist_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("dist")
    }

    fn default_build_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("build")
    }
}

impl DistConfig {
    /// Load and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ConfigNotFound`] when the file does not
    /// exist, [`PackagerError::InvalidConfig`] when it does not parse, or
    /// [`PackagerError::Io`] for other read failures.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PackagerError::ConfigNotFound {
                path: path.to_owned(),
            },
            _ => PackagerError::Io(err),
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Parse `source` as if it had been read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] when `source` does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use fmipp_packager::config::DistConfig;
    ///
    /// let source = r#"
    /// [metadata]
    /// name = "fmipp"
    /// version = "1.3"
    /// long_description_file = "README.txt"
    ///
    /// [distribution]
    /// packages = ["fmipp"]
    /// platform_tag = "win_amd64"
    /// "#;
    /// let config = DistConfig::from_toml_str(source, Utf8Path::new("pkg/dist.toml"))
    ///     .expect("valid configuration");
    /// assert_eq!(config.dist_dir(), Utf8Path::new("pkg/dist"));
    /// ```
    pub fn from_toml_str(source: &str, path: &Utf8Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(source).map_err(|err| PackagerError::InvalidConfig {
                path: path.to_owned(),
                reason: err.to_string(),
            })?;
        config.base_dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
            _ => Utf8PathBuf::from("."),
        };
        Ok(config)
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Root of the source tree.
    #[must_use]
    pub fn source_root(&self) -> Utf8PathBuf {
        match &self.distribution.source_root {
            Some(root) => self.resolve(root),
            None => self.base_dir.clone(),
        }
    }

    /// Location of the long-description document.
    #[must_use]
    pub fn long_description_path(&self) -> Utf8PathBuf {
        self.resolve(&self.metadata.long_description_file)
    }

    /// Archive output directory.
    #[must_use]
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.resolve(&self.distribution.dist_dir)
    }

    /// Build staging directory.
    #[must_use]
    pub fn build_dir(&self) -> Utf8PathBuf {
        self.resolve(&self.distribution.build_dir)
    }

    /// Resolve `path` against [`Self::base_dir`] unless it is absolute.
    #[must_use]
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Build the compatibility tag.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidValue`] when the python or ABI tag is
    /// malformed.
    pub fn wheel_tag(&self) -> Result<WheelTag> {
        let distribution = &self.distribution;
        Ok(WheelTag::new(
            &distribution.python_tag,
            &distribution.abi_tag,
            distribution.platform_tag.clone(),
        )?)
    }

    /// Flatten `[package_data]` into declarations.
    ///
    /// Declared packages come first, in `packages` order, followed by any
    /// table keys that name undeclared packages.
    #[must_use]
    pub fn declared_artifacts(&self) -> Vec<DeclaredArtifact> {
        let declared = self.distribution.packages.iter();
        let undeclared = self
            .package_data
            .keys()
            .filter(|name| !self.distribution.packages.contains(name));

        let mut seen = Vec::new();
        let mut artifacts = Vec::new();
        for package in declared.chain(undeclared) {
            if seen.contains(&package) {
                continue;
            }
            seen.push(package);
            let Some(paths) = self.package_data.get(package) else {
                continue;
            };
            artifacts.extend(paths.iter().map(|path| DeclaredArtifact {
                package: package.clone(),
                path: path.clone(),
            }));
        }
        artifacts
    }

    /// Assemble package metadata around an already loaded long description.
    #[must_use]
    pub fn package_metadata(&self, long_description: String) -> PackageMetadata {
        let section = &self.metadata;
        PackageMetadata {
            name: section.name.trim().to_owned(),
            version: section.version.trim().to_owned(),
            description: section.description.clone(),
            long_description,
            url: section.url.clone(),
            maintainer: section.maintainer.clone(),
            maintainer_email: section.maintainer_email.clone(),
            license: section.license.clone(),
            platform_tags: section.platforms.clone(),
            keywords: section.keywords.clone(),
            classifiers: section.classifiers.clone(),
        }
    }
}
