// In-memory session state: uploaded files, the active file and cached chart specs

use crate::chart::ChartSpec;
use crate::dataset::DataFile;
use std::collections::HashMap;
use tracing::debug;

/// Application state owned by a single caller. Nothing here outlives the
/// process.
#[derive(Debug, Default)]
pub struct Session {
    files: Vec<DataFile>,
    active_file_id: Option<String>,
    chart_specs: HashMap<String, Vec<ChartSpec>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and make it active. A file with the same name is replaced
    /// in place, taking its cached specs with it.
    pub fn add_file(&mut self, file: DataFile) {
        let id = file.id.clone();
        match self.files.iter().position(|f| f.name == file.name) {
            Some(index) => {
                let old = std::mem::replace(&mut self.files[index], file);
                self.chart_specs.remove(&old.id);
                debug!(name = %old.name, "replaced file");
            }
            None => self.files.push(file),
        }
        self.active_file_id = Some(id);
    }

    /// Remove a file and its cached specs. If it was active, the first
    /// remaining file becomes active. Returns the removed file.
    pub fn remove_file(&mut self, id: &str) -> Option<DataFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        let removed = self.files.remove(index);
        self.chart_specs.remove(id);

        if self.active_file_id.as_deref() == Some(id) {
            self.active_file_id = self.files.first().map(|f| f.id.clone());
        }
        Some(removed)
    }

    /// Select the active file; `None` clears the selection. Unknown ids are
    /// ignored and return false.
    pub fn set_active(&mut self, id: Option<&str>) -> bool {
        match id {
            None => {
                self.active_file_id = None;
                true
            }
            Some(id) if self.file(id).is_some() => {
                self.active_file_id = Some(id.to_string());
                true
            }
            Some(_) => false,
        }
    }

    pub fn active_file(&self) -> Option<&DataFile> {
        let id = self.active_file_id.as_deref()?;
        self.file(id)
    }

    pub fn file(&self, id: &str) -> Option<&DataFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    /// Store chart specs for a known file, replacing earlier ones.
    pub fn cache_chart_specs(&mut self, file_id: &str, specs: Vec<ChartSpec>) -> bool {
        if self.file(file_id).is_none() {
            return false;
        }
        self.chart_specs.insert(file_id.to_string(), specs);
        true
    }

    pub fn chart_specs(&self, file_id: &str) -> Option<&[ChartSpec]> {
        self.chart_specs.get(file_id).map(Vec::as_slice)
    }
}
