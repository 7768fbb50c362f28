//! crates/oceanus_core/src/upload.rs
//!
//! The dataset upload form, validated before anything is sent to the API.

use serde::{Deserialize, Serialize};

use crate::ports::{PortError, PortResult};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub name: String,
    pub kind: String,
    pub location: String,
    pub description: Option<String>,
    pub files: Vec<UploadFile>,
}

/// The JSON body of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl UploadForm {
    /// Rejects a blank name, a blank location or an empty file selection.
    pub fn validate(&self) -> PortResult<()> {
        if self.name.trim().is_empty()
            || self.location.trim().is_empty()
            || self.files.is_empty()
        {
            return Err(PortError::Validation(
                "Missing required fields: name, location and at least one file".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total_size_label(&self) -> String {
        let total: u64 = self.files.iter().map(|f| f.size_bytes).sum();
        format!("{:.1} MB", total as f64 / BYTES_PER_MB)
    }

    /// Validates the form and builds the request body.
    pub fn into_request(self) -> PortResult<UploadRequest> {
        self.validate()?;
        let size = self.total_size_label();
        let file_names: Vec<String> = self.files.into_iter().map(|f| f.name).collect();
        let metadata = serde_json::json!({
            "description": self.description,
            "files": file_names,
        });

        Ok(UploadRequest {
            name: self.name,
            kind: self.kind,
            location: self.location,
            size: Some(size),
            metadata: Some(metadata),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UploadForm {
        UploadForm {
            name: "Kelp Forest eDNA".to_string(),
            kind: "edna".to_string(),
            location: "Monterey Bay".to_string(),
            description: None,
            files: vec![UploadFile {
                name: "samples.csv".to_string(),
                size_bytes: 3 * 1024 * 1024,
            }],
        }
    }

    #[test]
    fn complete_form_is_accepted() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut no_name = form();
        no_name.name = "   ".to_string();
        let mut no_location = form();
        no_location.location.clear();
        let mut no_files = form();
        no_files.files.clear();

        for f in [no_name, no_location, no_files] {
            assert!(matches!(f.validate(), Err(PortError::Validation(_))));
        }
    }

    #[test]
    fn request_carries_size_and_file_names() {
        let mut f = form();
        f.files.push(UploadFile {
            name: "notes.txt".to_string(),
            size_bytes: 512 * 1024,
        });
        let req = f.into_request().unwrap();

        assert_eq!(req.size.as_deref(), Some("3.5 MB"));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["type"], "edna");
        assert_eq!(body["metadata"]["files"][1], "notes.txt");
    }

    #[test]
    fn size_label_has_one_decimal() {
        let mut f = form();
        assert_eq!(f.total_size_label(), "3.0 MB");
        f.files[0].size_bytes = 1_300_000;
        assert_eq!(f.total_size_label(), "1.2 MB");
        f.files[0].size_bytes = 40 * 1024;
        assert_eq!(f.total_size_label(), "0.0 MB");
    }

    #[test]
    fn invalid_form_never_becomes_a_request() {
        let mut f = form();
        f.files.clear();
        assert!(f.into_request().is_err());
    }
}
