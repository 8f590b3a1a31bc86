use std::fmt;

use axum::body::Bytes;

/// Client-side ceiling for one batch: 4.5 MB (decimal), the request size limit
/// of the hosting platform in front of the relay.
pub const MAX_UPLOAD_BYTES: u64 = 4_500_000;

#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

pub fn total_size(files: &[SelectedFile]) -> u64 {
    files.iter().map(SelectedFile::size).sum()
}

/// Decimal megabytes with two decimals, e.g. `1.23`.
pub fn megabytes(bytes: &u64) -> String {
    format!("{:.2}", *bytes as f64 / 1_000_000.0)
}

/// Limit label without trailing zeros, e.g. `4.5`.
pub fn limit_label(bytes: &u64) -> String {
    format!("{}", *bytes as f64 / 1_000_000.0)
}

/// Raised when an incoming batch would push the selection over the ceiling.
/// None of the incoming files are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimitExceeded {
    pub limit: u64,
    pub current: u64,
    pub incoming: u64,
}

impl fmt::Display for SizeLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total file size exceeds the {} MB limit. Current: {} MB, Adding: {} MB.",
            limit_label(&self.limit),
            megabytes(&self.current),
            megabytes(&self.incoming)
        )
    }
}

impl std::error::Error for SizeLimitExceeded {}

/// Ordered selection of files waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    files: Vec<SelectedFile>,
    limit: u64,
}

impl Default for UploadBatch {
    fn default() -> Self {
        Self::with_limit(MAX_UPLOAD_BYTES)
    }
}

impl UploadBatch {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            files: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Files already selected stay selected even if they no longer fit.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit;
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        total_size(&self.files)
    }

    pub fn exceeds_limit(&self) -> bool {
        self.total_bytes() > self.limit
    }

    /// Adds the whole incoming batch, or nothing at all when the combined
    /// size would exceed the limit.
    pub fn try_add(&mut self, incoming: Vec<SelectedFile>) -> Result<(), SizeLimitExceeded> {
        let current = self.total_bytes();
        let incoming_total = total_size(&incoming);
        if current.saturating_add(incoming_total) > self.limit {
            return Err(SizeLimitExceeded {
                limit: self.limit,
                current,
                incoming: incoming_total,
            });
        }
        self.files.extend(incoming);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> SelectedFile {
        SelectedFile::new(name, vec![0u8; size])
    }

    #[test]
    fn accepts_batch_up_to_the_exact_limit() {
        let mut batch = UploadBatch::default();
        batch.try_add(vec![file("a", 2_500_000)]).unwrap();
        batch.try_add(vec![file("b", 1_000_000), file("c", 1_000_000)]).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.total_bytes(), MAX_UPLOAD_BYTES);
        assert!(!batch.exceeds_limit());
    }

    #[test]
    fn rejects_whole_incoming_batch_when_over_limit() {
        let mut batch = UploadBatch::default();
        batch.try_add(vec![file("a", 4_000_000)]).unwrap();

        let err = batch
            .try_add(vec![file("small", 100_000), file("large", 400_001)])
            .unwrap_err();

        assert_eq!(
            err,
            SizeLimitExceeded {
                limit: MAX_UPLOAD_BYTES,
                current: 4_000_000,
                incoming: 500_001,
            }
        );
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].name, "a");
    }

    #[test]
    fn rejection_message_reports_decimal_megabytes() {
        let err = SizeLimitExceeded {
            limit: MAX_UPLOAD_BYTES,
            current: 1_234_567,
            incoming: 4_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Total file size exceeds the 4.5 MB limit. Current: 1.23 MB, Adding: 4.00 MB."
        );
    }

    #[test]
    fn single_oversized_file_is_rejected_on_empty_batch() {
        let mut batch = UploadBatch::with_limit(10);
        assert!(batch.try_add(vec![file("big", 11)]).is_err());
        assert!(batch.is_empty());
    }

    #[test]
    fn remove_keeps_order_and_ignores_bad_index() {
        let mut batch = UploadBatch::default();
        batch
            .try_add(vec![file("a", 1), file("b", 2), file("c", 3)])
            .unwrap();

        assert_eq!(batch.remove(1).map(|f| f.name), Some("b".to_string()));
        assert!(batch.remove(5).is_none());
        let names: Vec<&str> = batch.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(batch.total_bytes(), 4);
    }

    #[test]
    fn debug_omits_file_contents() {
        let rendered = format!("{:?}", SelectedFile::new("a.txt", "top secret contents"));
        assert!(rendered.contains("a.txt"));
        assert!(!rendered.contains("top secret"));
    }
}
