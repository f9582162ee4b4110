//! Case draft state and submission gating.
//!
//! A `CaseDraft` accumulates user input for one new case. `CaseForm` wraps
//! it with the case type catalog and the in-flight flag that keeps a second
//! submission from starting while one is outstanding.

use super::notification::Notification;
use crate::backend::{Attachment, BackendError, CaseType, CreatedCase, NewCase};
use std::fmt;
use std::path::Path;

/// File extensions the attachment picker accepts, with their MIME types.
///
const IMAGE_TYPES: [(&str, &str); 6] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// Fields of a draft that are edited as text.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DraftField {
    CaseType,
    Title,
    Description,
    Location,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DraftField::CaseType => "type",
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Location => "location",
        };
        write!(f, "{}", label)
    }
}

/// Errors raised before a draft is handed to the backend.
///
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// One or more required fields are empty
    #[error("Please fill in all required fields (missing: {})", join_fields(.missing))]
    IncompleteSubmission { missing: Vec<DraftField> },

    /// A submission is already outstanding
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// In-progress case submission.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseDraft {
    pub case_type: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub attachments: Vec<Attachment>,
}

impl CaseDraft {
    /// Set one field. An empty case type unsets it.
    ///
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::CaseType => {
                self.case_type = if value.is_empty() { None } else { Some(value) };
            }
            DraftField::Title => self.title = value,
            DraftField::Description => self.description = value,
            DraftField::Location => self.location = value,
        }
    }

    /// Returns the current text of a field.
    ///
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::CaseType => self.case_type.as_deref().unwrap_or(""),
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Location => &self.location,
        }
    }

    /// Append blobs to the attachment list.
    ///
    pub fn add_attachments(&mut self, files: impl IntoIterator<Item = Attachment>) {
        self.attachments.extend(files);
    }

    /// Check that every required field holds something other than whitespace.
    ///
    pub fn validate(&self) -> Result<(), DraftError> {
        let missing: Vec<DraftField> = [
            DraftField::CaseType,
            DraftField::Title,
            DraftField::Description,
            DraftField::Location,
        ]
        .into_iter()
        .filter(|field| self.field(*field).trim().is_empty())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DraftError::IncompleteSubmission { missing })
        }
    }

    /// Build the transfer payload. Callers validate first.
    ///
    fn payload(&self, submitter_id: Option<i64>) -> NewCase {
        NewCase {
            case_type: self.case_type.clone().unwrap_or_default(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            submitter_id,
            attachments: self.attachments.clone(),
        }
    }
}

/// Read an image from disk as an attachment. Only image extensions are
/// offered by the picker.
///
pub fn read_attachment(path: &Path) -> std::io::Result<Attachment> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let content_type = IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| mime.to_string())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not an image file", path.display()),
            )
        })?;
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment {
        file_name,
        content_type,
        bytes,
    })
}

/// Focusable rows of the new case form, top to bottom.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CaseFormRow {
    #[default]
    CaseType,
    Title,
    Description,
    Location,
    Attachment,
    Submit,
}

impl CaseFormRow {
    const ORDER: [CaseFormRow; 6] = [
        CaseFormRow::CaseType,
        CaseFormRow::Title,
        CaseFormRow::Description,
        CaseFormRow::Location,
        CaseFormRow::Attachment,
        CaseFormRow::Submit,
    ];

    fn step(self, step: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let index = Self::ORDER.iter().position(|row| *row == self).unwrap_or(0) as isize;
        Self::ORDER[(index + step).rem_euclid(len) as usize]
    }

    /// Text field edited by this row, if any.
    ///
    pub fn text_field(self) -> Option<DraftField> {
        match self {
            CaseFormRow::Title => Some(DraftField::Title),
            CaseFormRow::Description => Some(DraftField::Description),
            CaseFormRow::Location => Some(DraftField::Location),
            _ => None,
        }
    }
}

/// Progress of the case type catalog fetch.
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    #[default]
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

/// New case form: draft plus catalog and submission flag.
///
#[derive(Debug, Default)]
pub struct CaseForm {
    pub draft: CaseDraft,
    case_types: Vec<CaseType>,
    catalog: CatalogStatus,
    submitting: bool,
    row: CaseFormRow,
    attachment_path: String,
}

impl CaseForm {
    /// Returns the case type catalog.
    ///
    pub fn case_types(&self) -> &[CaseType] {
        &self.case_types
    }

    /// Store the fetched case type catalog.
    ///
    pub fn set_case_types(&mut self, case_types: Vec<CaseType>) {
        self.case_types = case_types;
        self.catalog = CatalogStatus::Loaded;
    }

    /// Record that the catalog could not be fetched. The next claim retries.
    ///
    pub fn fail_case_type_fetch(&mut self) {
        self.catalog = CatalogStatus::Failed;
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        self.catalog
    }

    /// Returns true when a fetch should start: nothing requested yet, or the
    /// previous attempt failed.
    ///
    pub fn claim_case_type_fetch(&mut self) -> bool {
        match self.catalog {
            CatalogStatus::NotRequested | CatalogStatus::Failed => {
                self.catalog = CatalogStatus::Loading;
                true
            }
            CatalogStatus::Loading | CatalogStatus::Loaded => false,
        }
    }

    /// Returns the display name of the selected case type.
    ///
    pub fn selected_type_name(&self) -> Option<&str> {
        let selected = self.draft.case_type.as_deref()?;
        self.case_types
            .iter()
            .find(|case_type| case_type.id == selected)
            .map(|case_type| case_type.name.as_str())
    }

    /// Move the type selection by `step` through the catalog, wrapping.
    ///
    pub fn cycle_case_type(&mut self, step: isize) {
        if self.case_types.is_empty() {
            return;
        }
        let len = self.case_types.len() as isize;
        let next = match self
            .draft
            .case_type
            .as_deref()
            .and_then(|id| self.case_types.iter().position(|t| t.id == id))
        {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        let id = self.case_types[next as usize].id.clone();
        self.draft.update_field(DraftField::CaseType, id);
    }

    pub fn focused_row(&self) -> CaseFormRow {
        self.row
    }

    pub fn next_row(&mut self) {
        self.row = self.row.step(1);
    }

    pub fn previous_row(&mut self) {
        self.row = self.row.step(-1);
    }

    pub fn attachment_path(&self) -> &str {
        &self.attachment_path
    }

    /// Type into the focused row. Only text fields and the attachment path
    /// take characters.
    ///
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.row.text_field() {
            let mut value = self.draft.field(field).to_string();
            value.push(c);
            self.draft.update_field(field, value);
        } else if self.row == CaseFormRow::Attachment {
            self.attachment_path.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.row.text_field() {
            let mut value = self.draft.field(field).to_string();
            value.pop();
            self.draft.update_field(field, value);
        } else if self.row == CaseFormRow::Attachment {
            self.attachment_path.pop();
        }
    }

    /// Read the file named in the attachment row and add it to the draft.
    /// The path is cleared only when the file was attached.
    ///
    pub fn attach_from_path(&mut self) -> std::io::Result<String> {
        let path = self.attachment_path.trim().to_string();
        let attachment = read_attachment(Path::new(&path))?;
        let name = attachment.file_name.clone();
        self.draft.add_attachments(std::iter::once(attachment));
        self.attachment_path.clear();
        Ok(name)
    }

    /// Whether a submission is outstanding.
    ///
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and mark a submission as in flight, returning the payload to
    /// send. The draft itself is left as is until the result arrives.
    ///
    pub fn begin_submit(&mut self, submitter_id: Option<i64>) -> Result<NewCase, DraftError> {
        if self.submitting {
            return Err(DraftError::SubmissionInFlight);
        }
        self.draft.validate()?;
        self.submitting = true;
        Ok(self.draft.payload(submitter_id))
    }

    /// Drop the in-flight flag when the payload never left, keeping the draft.
    ///
    pub fn abort_submit(&mut self) {
        self.submitting = false;
    }

    /// Settle an outstanding submission. Success resets the draft; failure
    /// keeps it so the user can retry.
    ///
    pub fn finish_submit(&mut self, result: Result<CreatedCase, BackendError>) -> Notification {
        self.submitting = false;
        match result {
            Ok(created) => {
                self.draft = CaseDraft::default();
                self.row = CaseFormRow::default();
                match created.case_id {
                    Some(id) => Notification::success(format!("Case #{} was submitted", id)),
                    None => Notification::success("Your case was submitted"),
                }
            }
            Err(e) => Notification::error(format!(
                "Failed to submit case: {}",
                e.user_message("Unknown error")
            )),
        }
    }
}
