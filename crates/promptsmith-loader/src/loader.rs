//! Template loader for YAML and JSON definition files.

use crate::error::{LoadError, Result};
use promptsmith_core::TemplateDefinition;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Serialization format of a template file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl TemplateFormat {
    /// Detects the format from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parses a template definition from `content` in this format.
    fn parse(self, content: &str) -> std::result::Result<TemplateDefinition, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Loads template definitions from files and caches them by name.
///
/// Definitions are validated while they are parsed, so everything in the
/// cache is a well-formed [`TemplateDefinition`]. Loading a second file with
/// an already cached name replaces the earlier definition.
///
/// # Examples
///
/// ```no_run
/// use promptsmith_loader::TemplateLoader;
///
/// let mut loader = TemplateLoader::with_dir("./templates");
/// let loaded = loader.load_directory(None)?;
/// println!("loaded {} templates", loaded.len());
///
/// if let Some(qa) = loader.get_template("zero_shot_qa") {
///     println!("{}", qa.description());
/// }
/// # Ok::<(), promptsmith_loader::LoadError>(())
/// ```
#[derive(Debug, Default)]
pub struct TemplateLoader {
    /// Directory used by [`TemplateLoader::load_directory`] when none is given.
    pub template_dir: Option<PathBuf>,
    cache: BTreeMap<String, TemplateDefinition>,
}

impl TemplateLoader {
    /// Creates a loader with no default directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader whose default directory is `template_dir`.
    ///
    /// The directory is not checked until it is loaded.
    pub fn with_dir(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: Some(template_dir.into()),
            cache: BTreeMap::new(),
        }
    }

    /// Loads a single template file and caches it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The extension is not `.yaml`, `.yml` or `.json`
    /// - The file cannot be read
    /// - The content is not a valid template definition
    pub fn load_template(&mut self, path: impl AsRef<Path>) -> Result<TemplateDefinition> {
        let path = path.as_ref();
        let template = read_template(path)?;
        tracing::debug!("loaded template '{}' from {}", template.name(), path.display());
        self.cache
            .insert(template.name().to_string(), template.clone());
        Ok(template)
    }

    /// Loads every template file in a directory.
    ///
    /// Uses `directory` if given, otherwise the loader's own directory. Files
    /// are visited in file name order; a file that fails to load is logged
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is available, the directory does not
    /// exist, or it cannot be listed.
    pub fn load_directory(
        &mut self,
        directory: Option<&Path>,
    ) -> Result<BTreeMap<String, TemplateDefinition>> {
        let target = match directory {
            Some(dir) => dir.to_path_buf(),
            None => self.template_dir.clone().ok_or(LoadError::NoDirectory)?,
        };

        let mut loaded = BTreeMap::new();
        for path in discover(&target)? {
            match self.load_template(&path) {
                Ok(template) => {
                    loaded.insert(template.name().to_string(), template);
                }
                Err(e) => {
                    tracing::warn!("skipping template file {}: {e}", path.display());
                }
            }
        }

        tracing::info!("loaded {} templates from {}", loaded.len(), target.display());
        Ok(loaded)
    }

    /// Returns a cached template by name.
    pub fn get_template(&self, name: &str) -> Option<&TemplateDefinition> {
        self.cache.get(name)
    }

    /// Returns a cached template by name, failing if it is not loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownTemplate`] if no template has that name.
    pub fn require(&self, name: &str) -> Result<&TemplateDefinition> {
        self.get_template(name)
            .ok_or_else(|| LoadError::UnknownTemplate(name.to_string()))
    }

    /// Names of all cached templates, sorted.
    pub fn list_templates(&self) -> Vec<String> {
        self.cache.keys().cloned().collect()
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Reads and parses one template file without caching it.
///
/// # Errors
///
/// Same as [`TemplateLoader::load_template`].
pub fn read_template(path: &Path) -> Result<TemplateDefinition> {
    if !path.is_file() {
        return Err(LoadError::TemplateNotFound(path.to_path_buf()));
    }

    let format = TemplateFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })?;

    tracing::debug!("reading {format} template from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    format.parse(&content).map_err(|reason| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Lists the template files in `dir` (non-recursive), sorted by file name.
///
/// # Errors
///
/// Returns [`LoadError::DirectoryNotFound`] if `dir` is not a directory and
/// [`LoadError::DirectoryListError`] if it cannot be read.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::DirectoryListError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::DirectoryListError {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();

        // Only include recognised template files
        if path.is_file() && TemplateFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
