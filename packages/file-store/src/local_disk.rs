//! A whole database kept in one local file.

use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{fs, io};

use bytes::Bytes;
use pathdb_core::{
    addressing, format_size, ops, query, shape_all, AllMode, ArgumentError, Codec, Entry, Error,
    KeyPath, LengthMode, Map, PingReport, Result, UpdatedDocument, Value, ValueKind,
};

use crate::options::FileStoreOptions;

const PING_KEY: &str = "__pathdb_ping__";

/// A key-value store over a single file at `<folder>/<name>.<ext>`.
///
/// Every operation loads the whole file, works on the tree in memory and,
/// for mutations, rewrites the whole file. The file (and its folder) is
/// created holding an empty map the first time it is needed.
///
/// # Example
///
/// ```rust
/// use pathdb_file_store::{FileStoreOptions, JsonStore};
/// use pathdb_core::Value;
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = JsonStore::open(FileStoreOptions::default().folder(dir.path()));
///
/// store.set("a.b", Value::from(5)).unwrap();
/// assert_eq!(store.get("a.b").unwrap(), Some(Value::from(5)));
/// ```
pub struct FileStore<C> {
    codec: C,
    options: FileStoreOptions,
    path: PathBuf,
}

impl<C: Codec + Default> FileStore<C> {
    /// Open a store with the codec's default configuration.
    pub fn open(options: FileStoreOptions) -> Self {
        Self::new(C::default(), options)
    }
}

impl<C: Codec> FileStore<C> {
    pub fn new(codec: C, options: FileStoreOptions) -> Self {
        let path = options
            .folder
            .join(format!("{}.{}", options.name, codec.extension()));
        FileStore {
            codec,
            options,
            path,
        }
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &FileStoreOptions {
        &self.options
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn key(&self, key: &str) -> Result<KeyPath> {
        KeyPath::parse(key, self.options.separator)
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.options.folder)
            .map_err(|e| Error::io(&self.options.folder, e))?;
        self.write_file(&self.path, &Value::map())
    }

    fn read_raw(&self) -> Result<Bytes> {
        self.ensure_exists()?;
        log::debug!("Reading {}...", self.path.display());
        fs::read(&self.path)
            .map(Bytes::from)
            .map_err(|e| Error::io(&self.path, e))
    }

    fn decode_map(&self, bytes: &Bytes) -> Result<Map> {
        match self.codec.decode(bytes)? {
            Value::Map(map) => Ok(map),
            other => Err(Error::decode(
                self.codec.format(),
                format!("database must hold an object, found {}", other.kind()),
            )),
        }
    }

    fn load_map(&self) -> Result<Map> {
        let bytes = self.read_raw()?;
        self.decode_map(&bytes)
    }

    /// Load the whole tree.
    fn load(&self) -> Result<Value> {
        self.load_map().map(Value::Map)
    }

    fn write_file(&self, path: &Path, tree: &Value) -> Result<()> {
        log::debug!("Writing {}...", path.display());
        let bytes = self.codec.encode(tree, self.options.readable)?;
        fs::write(path, &bytes).map_err(|e| Error::io(path, e))
    }

    /// Rewrite the whole tree.
    fn save(&self, tree: &Value) -> Result<()> {
        self.ensure_exists()?;
        self.write_file(&self.path, tree)
    }

    /// Remove `path` from the tree, pruning if configured.
    fn remove(&self, tree: &mut Value, path: &KeyPath) -> bool {
        if addressing::delete(tree, path).is_none() {
            return false;
        }
        if self.options.no_blank_data {
            addressing::prune_empty(tree);
        }
        true
    }

    // ==================== basic operations ====================

    /// Store `value` at `key` and return it as read back.
    pub fn set(&self, key: &str, value: Value) -> Result<Value> {
        let path = self.key(key)?;
        ops::storable(&value)?;

        let mut tree = self.load()?;
        addressing::set(&mut tree, &path, value);
        self.save(&tree)?;

        Ok(addressing::get(&tree, &path).cloned().unwrap_or_default())
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key(key)?;
        let tree = self.load()?;
        Ok(addressing::get(&tree, &path).cloned())
    }

    pub fn fetch(&self, key: &str) -> Result<Option<Value>> {
        self.get(key)
    }

    /// Present and not null.
    pub fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some_and(|v| !v.is_null()))
    }

    pub fn type_of(&self, key: &str) -> Result<Option<ValueKind>> {
        Ok(self.get(key)?.map(|v| v.kind()))
    }

    /// Remove `key`. Returns false, without touching the file, if it was
    /// absent.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let path = self.key(key)?;
        let mut tree = self.load()?;
        if !self.remove(&mut tree, &path) {
            return Ok(false);
        }
        self.save(&tree)?;
        Ok(true)
    }

    pub fn del(&self, key: &str) -> Result<bool> {
        self.delete(key)
    }

    // ==================== arithmetic ====================

    pub fn add(&self, key: &str, amount: Value) -> Result<Value> {
        let path = self.key(key)?;
        let amount = ops::amount(&amount)?;

        let mut tree = self.load()?;
        let result = ops::added(addressing::get(&tree, &path), amount);
        addressing::set(&mut tree, &path, result.clone());
        self.save(&tree)?;
        Ok(result)
    }

    /// Subtract `amount`, deleting the key once it would drop below 1.
    pub fn subtract(&self, key: &str, amount: Value) -> Result<Value> {
        let path = self.key(key)?;
        let amount = ops::amount(&amount)?;

        let mut tree = self.load()?;
        match ops::subtracted(addressing::get(&tree, &path), amount) {
            ops::SubtractOutcome::Delete => {
                if self.remove(&mut tree, &path) {
                    self.save(&tree)?;
                }
                Ok(Value::Integer(0))
            }
            ops::SubtractOutcome::Store(value) => {
                addressing::set(&mut tree, &path, value.clone());
                self.save(&tree)?;
                Ok(value)
            }
        }
    }

    pub fn sub(&self, key: &str, amount: Value) -> Result<Value> {
        self.subtract(key, amount)
    }

    // ==================== arrays ====================

    fn store_array(
        &self,
        key: &str,
        update: impl FnOnce(Option<&Value>) -> Vec<Value>,
    ) -> Result<Vec<Value>> {
        let path = self.key(key)?;
        let mut tree = self.load()?;
        let arr = update(addressing::get(&tree, &path));
        addressing::set(&mut tree, &path, Value::Array(arr.clone()));
        self.save(&tree)?;
        Ok(arr)
    }

    pub fn push(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        ops::storable(&value)?;
        self.store_array(key, |current| ops::pushed(current, value))
    }

    pub fn unpush(&self, key: &str, value: Value) -> Result<Vec<Value>> {
        ops::storable(&value)?;
        self.store_array(key, |current| ops::unpushed(current, &value))
    }

    fn store_by_priority(
        &self,
        key: &str,
        update: impl FnOnce(Option<&Value>) -> Option<Vec<Value>>,
    ) -> Result<Option<Vec<Value>>> {
        let path = self.key(key)?;
        let mut tree = self.load()?;
        let Some(arr) = update(addressing::get(&tree, &path)) else {
            return Ok(None);
        };
        addressing::set(&mut tree, &path, Value::Array(arr.clone()));
        self.save(&tree)?;
        Ok(Some(arr))
    }

    /// Replace the element at 1-based `priority`.
    pub fn set_by_priority(
        &self,
        key: &str,
        value: Value,
        priority: usize,
    ) -> Result<Option<Vec<Value>>> {
        ops::storable(&value)?;
        let index = ops::priority_index(priority)?;
        self.store_by_priority(key, |current| ops::replaced_at(current, index, value))
    }

    /// Remove the element at 1-based `priority`.
    pub fn del_by_priority(&self, key: &str, priority: usize) -> Result<Option<Vec<Value>>> {
        let index = ops::priority_index(priority)?;
        self.store_by_priority(key, |current| ops::removed_at(current, index))
    }

    // ==================== whole database ====================

    pub fn all(&self, mode: AllMode) -> Result<Value> {
        Ok(shape_all(&self.load_map()?, mode))
    }

    pub fn get_all(&self) -> Result<Value> {
        self.all(AllMode::All)
    }

    pub fn fetch_all(&self) -> Result<Value> {
        self.all(AllMode::All)
    }

    pub fn delete_all(&self) -> Result<()> {
        self.save(&Value::map())
    }

    pub fn clear(&self) -> Result<()> {
        self.delete_all()
    }

    /// Copy the database to `<folder>/<name>.<ext>`.
    pub fn backup(&self, name: &str) -> Result<PathBuf> {
        let extension = self.codec.extension();
        if name.trim().is_empty() {
            return Err(ArgumentError::BlankBackupName.into());
        }
        if name.ends_with(&format!(".{}", extension)) {
            return Err(ArgumentError::BackupHasExtension { extension }.into());
        }
        if name == self.options.name {
            return Err(ArgumentError::BackupNameIsDatabase.into());
        }

        let tree = self.load()?;
        let target = self.options.folder.join(format!("{}.{}", name, extension));
        self.write_file(&target, &tree)?;
        log::info!("Backed up {} to {}", self.path.display(), target.display());
        Ok(target)
    }

    /// Replace the database with the contents of a backup file.
    pub fn load_backup(&self, path: &Path) -> Result<()> {
        let extension = self.codec.extension();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            return Err(ArgumentError::WrongBackupExtension {
                path: path.to_path_buf(),
                extension,
            }
            .into());
        }
        if !path.is_file() {
            return Err(ArgumentError::BackupMissing {
                path: path.to_path_buf(),
            }
            .into());
        }

        log::debug!("Reading {}...", path.display());
        let bytes = fs::read(path)
            .map(Bytes::from)
            .map_err(|e| Error::io(path, e))?;
        let tree = Value::Map(self.decode_map(&bytes)?);
        self.save(&tree)?;
        log::info!("Loaded backup {} into {}", path.display(), self.path.display());
        Ok(())
    }

    // ==================== key scans ====================

    fn scan(&self, pattern: &str, matches: impl Fn(&str, &str) -> bool) -> Result<Vec<Entry>> {
        if pattern.is_empty() {
            return Err(ArgumentError::BlankPattern.into());
        }
        Ok(self
            .load_map()?
            .iter()
            .filter(|(key, _)| matches(key, pattern))
            .map(|(key, data)| Entry {
                key: key.clone(),
                data: data.clone(),
            })
            .collect())
    }

    /// Top-level entries whose key starts with `pattern`.
    pub fn starts_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.scan(pattern, |key, p| key.starts_with(p))
    }

    pub fn ends_with(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.scan(pattern, |key, p| key.ends_with(p))
    }

    pub fn includes(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.scan(pattern, |key, p| key.contains(p))
    }

    // ==================== documents ====================

    fn documents(&self, key: &str) -> Result<(Value, KeyPath, Vec<Value>)> {
        let path = self.key(key)?;
        let tree = self.load()?;
        let docs = query::documents(addressing::get(&tree, &path))?;
        Ok((tree, path, docs))
    }

    fn store_documents(&self, mut tree: Value, path: &KeyPath, docs: Vec<Value>) -> Result<()> {
        addressing::set(&mut tree, path, Value::Array(docs));
        self.save(&tree)
    }

    pub fn find(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        let (_, _, docs) = self.documents(key)?;
        Ok(query::find(&docs, query))
    }

    pub fn find_one(&self, key: &str, query: &Map) -> Result<Option<Value>> {
        let (_, _, docs) = self.documents(key)?;
        Ok(query::find_one(&docs, query))
    }

    /// Merge `update` into every matching document.
    pub fn find_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<Vec<UpdatedDocument>> {
        let (tree, path, mut docs) = self.documents(key)?;
        let updated = query::update_matching(&mut docs, query, update, false);
        if !updated.is_empty() {
            self.store_documents(tree, &path, docs)?;
        }
        Ok(updated)
    }

    pub fn find_and_delete(&self, key: &str, query: &Map) -> Result<Vec<Value>> {
        let (tree, path, mut docs) = self.documents(key)?;
        let removed = query::delete_matching(&mut docs, query, false);
        if !removed.is_empty() {
            self.store_documents(tree, &path, docs)?;
        }
        Ok(removed)
    }

    pub fn find_one_and_update(
        &self,
        key: &str,
        query: &Map,
        update: &Map,
    ) -> Result<UpdatedDocument> {
        let (tree, path, mut docs) = self.documents(key)?;
        let updated = query::update_matching(&mut docs, query, update, true)
            .into_iter()
            .next()
            .ok_or(Error::NoMatch)?;
        self.store_documents(tree, &path, docs)?;
        Ok(updated)
    }

    pub fn find_one_and_delete(&self, key: &str, query: &Map) -> Result<Value> {
        let (tree, path, mut docs) = self.documents(key)?;
        let removed = query::delete_matching(&mut docs, query, true)
            .into_iter()
            .next()
            .ok_or(Error::NoMatch)?;
        self.store_documents(tree, &path, docs)?;
        Ok(removed)
    }

    // ==================== reporting ====================

    /// Number of top-level entries, or the raw file length.
    ///
    /// Raw length counts characters for text encodings and bytes for binary
    /// ones.
    pub fn length(&self, mode: LengthMode) -> Result<usize> {
        let bytes = self.read_raw()?;
        match mode {
            LengthMode::Object => Ok(self.decode_map(&bytes)?.len()),
            LengthMode::Raw if self.codec.format().is_binary() => Ok(bytes.len()),
            LengthMode::Raw => Ok(String::from_utf8_lossy(&bytes).chars().count()),
        }
    }

    /// File size, e.g. `"1.50 Kb"`.
    pub fn size(&self) -> Result<String> {
        self.ensure_exists()?;
        let metadata = fs::metadata(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(format_size(metadata.len()))
    }

    /// Time one write and one read of a reserved key, leaving the data as
    /// it was.
    pub fn ping(&self) -> Result<PingReport> {
        // One segment whatever the separator, so nothing nests under it.
        let path = KeyPath::from_segments(vec![PING_KEY.to_string()], self.options.separator)?;

        let started = Instant::now();
        let mut tree = self.load()?;
        let previous = addressing::get(&tree, &path).cloned();
        addressing::set(&mut tree, &path, Value::from("ping"));
        self.save(&tree)?;
        let write = started.elapsed();

        let started = Instant::now();
        addressing::get(&self.load()?, &path);
        let read = started.elapsed();

        match previous {
            Some(previous) => addressing::set(&mut tree, &path, previous),
            None => {
                addressing::delete(&mut tree, &path);
            }
        }
        self.save(&tree)?;
        Ok(PingReport::new(read, write))
    }

    /// Remove the database file, and its folder if nothing else is left in
    /// it.
    pub fn destroy(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&self.path, e)),
        }

        let folder = &self.options.folder;
        let is_empty = match fs::read_dir(folder) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(Error::io(folder, e)),
        };
        if is_empty {
            fs::remove_dir(folder).map_err(|e| Error::io(folder, e))?;
        }

        log::info!("Destroyed {}", self.path.display());
        Ok(())
    }
}
