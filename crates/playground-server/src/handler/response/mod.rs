//! Response types of the upload API.
//!
//! Every outcome of the upload endpoint is rendered as a [`ResponseEnvelope`],
//! optionally carrying [`FileInfo`] for a stored file.

mod envelope;
mod file_info;

pub use envelope::{FILE_CREATED_MESSAGE, ResponseEnvelope, write_error};
pub use file_info::{FileInfo, clean_file_name};
