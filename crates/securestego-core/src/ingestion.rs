//! File ingestion for the workflow input slots.
//!
//! [`FileIngestion`] is the drop zone / file dialog of a single input. It
//! validates what is offered and hands the accepted file back to its owner,
//! but never stores it. The owning workflow keeps file and preview together
//! in a [`FileSlot`], so clearing one always clears the other.

use log::debug;

use crate::media::{MimeFilter, Preview, SelectedFile};
use crate::{Result, WorkflowError};

/// Drag and pick handling of one input.
#[derive(Debug, Default)]
pub struct FileIngestion {
    accept: MimeFilter,
    dragging: bool,
}

impl FileIngestion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accept(accept: MimeFilter) -> Self {
        Self {
            accept,
            dragging: false,
        }
    }

    pub fn accept(&self) -> &MimeFilter {
        &self.accept
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// A drag enters the zone, it only arms when something is carried.
    pub fn drag_enter(&mut self, item_count: usize) {
        if item_count > 0 {
            self.dragging = true;
        }
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Files dropped onto the zone.
    ///
    /// Always disarms the drag state, even when nothing is accepted.
    pub fn drop_files(&mut self, files: Vec<SelectedFile>) -> Option<SelectedFile> {
        self.dragging = false;
        self.offer(files)
    }

    /// Files chosen through the file dialog.
    pub fn pick_files(&self, files: Vec<SelectedFile>) -> Option<SelectedFile> {
        self.offer(files)
    }

    /// Like [`Self::drop_files`], handing the accepted file to `on_select`.
    pub fn drop_into(&mut self, files: Vec<SelectedFile>, on_select: impl FnOnce(SelectedFile)) {
        if let Some(file) = self.drop_files(files) {
            on_select(file);
        }
    }

    /// Like [`Self::pick_files`], handing the accepted file to `on_select`.
    pub fn pick_into(&self, files: Vec<SelectedFile>, on_select: impl FnOnce(SelectedFile)) {
        if let Some(file) = self.pick_files(files) {
            on_select(file);
        }
    }

    /// Whether `file` passes the type filter of this input.
    pub fn check(&self, file: &SelectedFile) -> Result<()> {
        if self.accept.accepts(file.mime()) {
            Ok(())
        } else {
            Err(WorkflowError::UnsupportedMedia(file.mime().to_string()))
        }
    }

    /// Only the first file counts, a mismatching type is silently ignored.
    fn offer(&self, files: Vec<SelectedFile>) -> Option<SelectedFile> {
        let file = files.into_iter().next()?;
        match self.check(&file) {
            Ok(()) => Some(file),
            Err(e) => {
                debug!("ignoring {}: {e}", file.name());
                None
            }
        }
    }
}

/// The file of one workflow input together with its preview.
#[derive(Debug, Clone, Default)]
pub struct FileSlot {
    content: Option<(SelectedFile, Preview)>,
}

impl FileSlot {
    /// Replaces the current file, the preview is derived right away.
    pub fn select(&mut self, file: SelectedFile) {
        let preview = Preview::of(&file);
        self.content = Some((file, preview));
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.content.as_ref().map(|(file, _)| file)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.content.as_ref().map(|(_, preview)| preview)
    }

    pub fn is_set(&self) -> bool {
        self.content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::PEM_MIME;

    fn png(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, "application/pdf", vec![b'%'])
    }

    #[test]
    fn should_arm_only_when_items_are_dragged() {
        let mut zone = FileIngestion::new();
        zone.drag_enter(0);
        assert!(!zone.is_dragging());

        zone.drag_enter(2);
        assert!(zone.is_dragging());

        zone.drag_leave();
        assert!(!zone.is_dragging());
    }

    #[test]
    fn should_disarm_on_an_invalid_drop() {
        let mut zone = FileIngestion::new();
        zone.drag_enter(1);

        assert_eq!(zone.drop_files(vec![pdf("notes.pdf")]), None);
        assert!(!zone.is_dragging());

        zone.drag_enter(1);
        assert_eq!(zone.drop_files(vec![]), None);
        assert!(!zone.is_dragging());
    }

    #[test]
    fn should_consider_only_the_first_file() {
        let mut zone = FileIngestion::new();

        let accepted = zone.drop_files(vec![png("catA.png"), png("dog.png")]);
        assert_eq!(accepted.map(|f| f.name().to_string()), Some("catA.png".into()));

        assert_eq!(zone.drop_files(vec![pdf("notes.pdf"), png("dog.png")]), None);
    }

    #[test]
    fn should_validate_the_file_dialog_the_same_way() {
        let zone = FileIngestion::new();
        assert!(zone.pick_files(vec![pdf("notes.pdf")]).is_none());

        let mut selected = None;
        zone.pick_into(vec![png("dog.png")], |f| selected = Some(f));
        assert_eq!(selected, Some(png("dog.png")));
    }

    #[test]
    fn should_name_the_rejected_type() {
        let zone = FileIngestion::new();
        let err = zone.check(&pdf("notes.pdf")).unwrap_err();
        assert_eq!(err.to_string(), "File type 'application/pdf' is not accepted here");
        assert!(zone.check(&png("dog.png")).is_ok());
    }

    #[test]
    fn should_honor_a_custom_filter() {
        let mut zone = FileIngestion::with_accept(MimeFilter::Exact(PEM_MIME.into()));
        let key = SelectedFile::new("private.pem", PEM_MIME, b"-----BEGIN".to_vec());

        let mut selected = None;
        zone.drop_into(vec![key.clone()], |f| selected = Some(f));
        assert_eq!(selected, Some(key));
        assert!(zone.drop_files(vec![png("dog.png")]).is_none());
    }

    #[test]
    fn should_clear_file_and_preview_together() {
        let mut slot = FileSlot::default();
        slot.select(png("catA.png"));
        assert!(slot.file().is_some());
        assert!(slot.preview().is_some());

        slot.clear();
        assert!(slot.file().is_none());
        assert!(slot.preview().is_none());

        slot.clear();
        assert!(!slot.is_set());
        assert!(slot.preview().is_none());
    }

    #[test]
    fn should_replace_file_and_preview_on_reselection() {
        let mut slot = FileSlot::default();
        slot.select(png("catA.png"));
        let first = slot.preview().cloned();

        slot.select(SelectedFile::new("dog.png", "image/png", b"other".to_vec()));
        assert_eq!(slot.file().map(|f| f.name()), Some("dog.png"));
        assert_ne!(slot.preview().cloned(), first);
    }
}
