// src/modules/files.rs
// Assistant file list shown beside the chat

use crate::modules::assistant::{AssistantFile, FileListing};
use crate::modules::chat::references::references_file;
use crate::modules::chat::state::Reference;
use crate::{log_error, log_info};

#[derive(Debug, Default)]
pub struct FilesState {
    files: Vec<AssistantFile>,
    visible: bool,
    loaded: bool,
}

impl FilesState {
    pub fn new(visible: bool) -> Self {
        Self { files: Vec::new(), visible, loaded: false }
    }

    /// Keeps the listing only when the collaborator reports success.
    pub fn record(&mut self, listing: FileListing) {
        self.loaded = true;

        if listing.is_success() {
            log_info!("Loaded {} assistant files", listing.files.len());
            self.files = listing.files;
        } else {
            log_error!(
                "Error fetching files: {}",
                listing.message.as_deref().unwrap_or(&listing.status)
            );
            self.files.clear();
        }
    }

    pub fn files(&self) -> &[AssistantFile] {
        &self.files
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_referenced(file: &AssistantFile, referenced: &[Reference]) -> bool {
        referenced.iter().any(|r| references_file(r, &file.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> AssistantFile {
        AssistantFile {
            id: name.to_string(),
            name: name.to_string(),
            status: Some("Available".to_string()),
            size: None,
            created_on: None,
            updated_on: None,
            percent_done: Some(1.0),
        }
    }

    #[test]
    fn test_success_listing_is_recorded() {
        let mut state = FilesState::new(true);
        state.record(FileListing::success(vec![file("notes.txt"), file("plan.pdf")]));

        assert!(state.is_loaded());
        assert_eq!(state.files().len(), 2);
    }

    #[test]
    fn test_failed_listing_leaves_list_empty() {
        let mut state = FilesState::new(true);
        state.record(FileListing::success(vec![file("old.txt")]));
        state.record(FileListing {
            status: "error".to_string(),
            files: vec![file("ignored.txt")],
            message: Some("unauthorized".to_string()),
        });

        assert!(state.files().is_empty());
    }

    #[test]
    fn test_referenced_files() {
        let refs = vec![Reference::named("Hello, see notes.txt")];
        assert!(FilesState::is_referenced(&file("notes.txt"), &refs));
        assert!(!FilesState::is_referenced(&file("plan.pdf"), &refs));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut state = FilesState::new(false);
        state.toggle_visible();
        assert!(state.is_visible());
    }
}
