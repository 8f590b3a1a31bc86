//! Upload widget: local file selection, the client-side size guard and
//! submission to the relay endpoint. Used by the `relay-upload` binary.

pub mod relay_client;
pub mod size_guard;
pub mod widget;

pub use relay_client::{HttpRelayClient, RelayClient, RelayClientError};
pub use size_guard::{SelectedFile, UploadBatch, MAX_UPLOAD_BYTES};
pub use widget::{
    AddFilesError, StatusKind, StatusMessage, SubmitError, UploadReceipt, UploadWidget,
    WidgetPhase,
};
