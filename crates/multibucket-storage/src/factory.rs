//! Builder-style factory for custom backend definitions.

use multibucket_core::StorageParams;

use crate::backend::{BackendDef, ResolveBy};
use crate::error::{StorageError, StorageResult};

/// Create a backend definition for a custom module.
///
/// The module name is sanitized into the display label only; resolution
/// always uses the original name. An empty name is rejected immediately.
///
/// # Example
///
/// ```
/// use multibucket_core::StorageParams;
/// use multibucket_storage::create_backend_class;
///
/// let uploads = create_backend_class(
///     "uploads",
///     StorageParams::new()
///         .with_location("uploads")
///         .with_default_acl("private")
///         .with_file_overwrite(false),
/// )
/// .unwrap();
/// assert_eq!(uploads.label(), "UploadsStorage");
/// ```
pub fn create_backend_class(
    module_name: &str,
    defaults: StorageParams,
) -> StorageResult<BackendDef> {
    if module_name.is_empty() {
        return Err(StorageError::InvalidModuleName(
            "module name must not be empty".to_string(),
        ));
    }

    Ok(BackendDef::new(
        sanitize_class_label(module_name),
        ResolveBy::Module(module_name.to_string()),
        defaults,
    ))
}

/// Sanitize a module or setting name into a `...Storage` display label.
///
/// The first character is uppercased and the rest lowercased, every
/// character outside `[A-Za-z0-9_]` becomes `_`, and a leading digit gets a
/// `_` prefix.
pub fn sanitize_class_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 8);
    for (i, c) in name.chars().enumerate() {
        let c = if i == 0 {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        };
        if c.is_ascii_alphanumeric() || c == '_' {
            label.push(c);
        } else {
            label.push('_');
        }
    }
    if label.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        label.insert(0, '_');
    }
    label.push_str("Storage");
    label
}
