//! Dictionary Management Module
//!
//! Loads the vibrato-rkyv dictionary used by the Japanese tagger.
//! Preset dictionaries (IPADIC, UniDic) are downloaded on the first run and read from the
//! cache directory afterwards. A local dictionary file can be loaded directly as well.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::info;
use vibrato_rkyv::Dictionary;
use vibrato_rkyv::dictionary::{LoadMode, PresetDictionaryKind};

use crate::config::DictionaryConfig;
use crate::errors::DictionaryError;

/// Where the dictionary comes from.
#[derive(Debug, Clone)]
enum DictionarySource {
  /// Downloaded preset, cached under `cache_dir/<preset name>`
  Preset(PresetDictionaryKind),
  /// Compiled dictionary file on disk
  Local(PathBuf),
}

/// Dictionary manager for vibrato-rkyv
pub struct DictionaryManager {
  /// Dictionary cache directory
  cache_dir: PathBuf,

  source: DictionarySource,

  /// Loaded dictionary, shared through `Arc`. The load result (including errors) is cached.
  dictionary: OnceLock<Result<Arc<Dictionary>, DictionaryError>>,
}

impl DictionaryManager {
  /// Returns the path of the cache directory
  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  /// Preset kind, `None` for a local dictionary
  pub fn preset_kind(&self) -> Option<PresetDictionaryKind> {
    match self.source {
      DictionarySource::Preset(kind) => Some(kind),
      DictionarySource::Local(_) => None,
    }
  }

  /// Uses a preset dictionary cached in the OS cache directory.
  ///
  /// # Errors
  /// `CacheDirNotFound` if the OS has no cache directory.
  pub fn with_preset(preset_kind: PresetDictionaryKind) -> Result<Self, DictionaryError> {
    Ok(Self::with_preset_in(preset_kind, default_cache_dir()?))
  }

  /// Uses a preset dictionary cached under `cache_dir`.
  pub fn with_preset_in(preset_kind: PresetDictionaryKind, cache_dir: impl Into<PathBuf>) -> Self {
    Self {
      cache_dir: cache_dir.into(),
      source: DictionarySource::Preset(preset_kind),
      dictionary: OnceLock::new(),
    }
  }

  /// Uses a local dictionary file.
  ///
  /// # Errors
  /// `DictionaryNotFound` if the file does not exist.
  pub fn from_local_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
      return Err(DictionaryError::DictionaryNotFound(path.display().to_string()));
    }

    let cache_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    Ok(Self {
      cache_dir,
      source: DictionarySource::Local(path),
      dictionary: OnceLock::new(),
    })
  }

  /// Builds a manager from the `[dictionary]` section.
  ///
  /// # Errors
  /// `CacheDirNotFound` when no `cache_dir` is configured and the OS has none.
  pub fn from_config(config: &DictionaryConfig) -> Result<Self, DictionaryError> {
    let preset_kind = config.preset.into();
    match &config.cache_dir {
      Some(dir) => Ok(Self::with_preset_in(preset_kind, dir)),
      None => Self::with_preset(preset_kind),
    }
  }

  /// Loads the dictionary.
  ///
  /// - the first call reads (and for presets possibly downloads) the dictionary
  /// - later calls return a clone of the cached `Arc<Dictionary>`
  /// - a failed first load is cached and returned again
  pub fn load(&self) -> Result<Arc<Dictionary>, DictionaryError> {
    self.dictionary.get_or_init(|| self.load_inner().map(Arc::new)).clone()
  }

  fn load_inner(&self) -> Result<Dictionary, DictionaryError> {
    match &self.source {
      DictionarySource::Local(path) => {
        info!(path = %path.display(), "loading local dictionary");
        Dictionary::from_path(path, LoadMode::TrustCache)
          .map_err(|e| DictionaryError::VibratoLoad(Arc::new(e)))
      }
      DictionarySource::Preset(kind) => self.load_from_preset(*kind),
    }
  }

  /// Downloads the preset on the first run, loads it from the cache afterwards.
  fn load_from_preset(
    &self,
    preset_kind: PresetDictionaryKind,
  ) -> Result<Dictionary, DictionaryError> {
    std::fs::create_dir_all(&self.cache_dir)
      .map_err(|e| DictionaryError::CacheDirCreationFailed(Arc::new(e)))?;

    let dict_dir = self.cache_dir.join(preset_kind.name());
    info!(
      preset = preset_kind.name(),
      dir = %dict_dir.display(),
      "loading preset dictionary"
    );

    Dictionary::from_preset_with_download(preset_kind, &dict_dir)
      .map_err(|e| DictionaryError::PresetDictDownloadFailed(Arc::new(e)))
  }
}

/// Returns the default cache directory path according to the OS
///
/// | OS      | Example Path                                 |
/// |---------|----------------------------------------------|
/// | Linux   | `~/.cache/keygram/dict`                      |
/// | macOS   | `~/Library/Caches/keygram/dict`              |
/// | Windows | `C:\Users\{user}\AppData\Local\keygram\dict` |
fn default_cache_dir() -> Result<PathBuf, DictionaryError> {
  let base = dirs::cache_dir().ok_or(DictionaryError::CacheDirNotFound)?;

  Ok(base.join("keygram").join("dict"))
}

/// `vibrato_rkyv::Dictionary` has no `Debug`, so only meta information is shown.
impl fmt::Debug for DictionaryManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DictionaryManager")
      .field("cache_dir", &self.cache_dir)
      .field("source", &self.source)
      .field("dictionary_initialized", &self.dictionary.get().is_some())
      .finish()
  }
}
