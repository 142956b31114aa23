//! File upload constraint

use crate::foundation::{
    Check, CheckContext, CheckError, FieldError, Transform, TransformError, UploadedFile, Value,
};

/// Accepts a successfully uploaded file.
///
/// Transform turns the transport's upload object into an [`UploadedFile`];
/// Check rejects uploads whose status code is not zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Upload;

impl Transform for Upload {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        let Value::Map(map) = raw else {
            return Err(TransformError::new("upload", "Must be a file upload."));
        };
        serde_json::from_value::<UploadedFile>(serde_json::Value::Object(map))
            .map(Value::Upload)
            .map_err(|_| TransformError::new("upload", "Must be a file upload."))
    }
}

impl Check for Upload {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        let Value::Upload(file) = &value else {
            return Err(FieldError::invalid_type("upload", value.kind()).into());
        };
        match file.failure_reason() {
            None => Ok(value),
            Some(reason) => Err(FieldError::new("upload", "A file upload failed: {reason}.")
                .with_param("status", file.error)
                .with_param("reason", reason)
                .into()),
        }
    }
}

#[must_use]
pub const fn upload() -> Upload {
    Upload
}
