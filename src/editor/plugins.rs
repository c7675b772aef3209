use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use super::Emitter;

/// Registry name of the upload-capable plugin.
pub const FILE_REPOSITORY: &str = "FileRepository";

/// A plugin loaded into an editor.
#[derive(Debug, Clone)]
pub enum Plugin {
    FileRepository(Arc<FileRepository>),
    /// A plugin the adapter has no special knowledge of.
    Generic(String),
}

/// The editor's pluggable-capability registry, queryable by name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from plugin names. `FileRepository` gets a live
    /// repository; every other name is registered as a generic plugin.
    pub fn from_names(names: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let plugin = if name == FILE_REPOSITORY {
                Plugin::FileRepository(Arc::new(FileRepository::new()))
            } else {
                Plugin::Generic(name.to_string())
            };
            registry.insert(name, plugin);
        }
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, plugin: Plugin) {
        self.plugins.insert(name.into(), plugin);
    }

    pub fn has(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    pub fn file_repository(&self) -> Option<Arc<FileRepository>> {
        match self.get(FILE_REPOSITORY)? {
            Plugin::FileRepository(repository) => Some(Arc::clone(repository)),
            Plugin::Generic(_) => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Release every listener held by the plugins.
    pub fn clear_listeners(&self) {
        for plugin in self.plugins.values() {
            if let Plugin::FileRepository(repository) = plugin {
                repository.clear_listeners();
            }
        }
    }
}

/// Tracks upload loaders; one loader per file being uploaded.
#[derive(Debug)]
pub struct FileRepository {
    next_id: AtomicU64,
    loaders: Mutex<Vec<Arc<UploadLoader>>>,
    loader_created: Emitter<Arc<UploadLoader>>,
}

impl FileRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            loaders: Mutex::new(Vec::new()),
            loader_created: Emitter::new(),
        }
    }

    pub fn create_loader(&self, file_name: impl Into<String>) -> Arc<UploadLoader> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let loader = Arc::new(UploadLoader::new(id, file_name.into()));
        self.loaders.lock().push(Arc::clone(&loader));
        self.loader_created.emit(&loader);
        loader
    }

    pub fn loaders(&self) -> Vec<Arc<UploadLoader>> {
        self.loaders.lock().clone()
    }

    pub const fn loader_created(&self) -> &Emitter<Arc<UploadLoader>> {
        &self.loader_created
    }

    pub fn clear_listeners(&self) {
        self.loader_created.clear();
        for loader in self.loaders.lock().iter() {
            loader.response_changes().clear();
        }
    }
}

impl Default for FileRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// A single upload in progress. The transport that fills in the response
/// lives outside this crate; the loader only reports what it was given.
#[derive(Debug)]
pub struct UploadLoader {
    id: u64,
    file_name: String,
    response: Mutex<Option<Value>>,
    response_changes: Emitter<Option<Value>>,
}

impl UploadLoader {
    fn new(id: u64, file_name: String) -> Self {
        Self {
            id,
            file_name,
            response: Mutex::new(None),
            response_changes: Emitter::new(),
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn upload_response(&self) -> Option<Value> {
        self.response.lock().clone()
    }

    /// Record the server response. Every report emits, even one equal to
    /// the previous response.
    pub fn set_upload_response(&self, response: Value) {
        let response = Some(response);
        self.response.lock().clone_from(&response);
        self.response_changes.emit(&response);
    }

    pub const fn response_changes(&self) -> &Emitter<Option<Value>> {
        &self.response_changes
    }
}
