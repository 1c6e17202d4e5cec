//! # Validation Module
//!
//! Input checks for callers that collect item data from a form.
//!
//! The engine itself assumes pre-validated input: `create` and `update`
//! never fail. A caller runs these first and shows the error next to the
//! offending field.
//!
//! ## Usage
//! ```rust
//! use larder_core::types::NewItem;
//! use larder_core::validation::validate_new_item;
//!
//! assert!(validate_new_item(&NewItem::new("Olive oil", 1).unit("bottle")).is_ok());
//! assert!(validate_new_item(&NewItem::new("   ", 1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{ItemPatch, NewItem};
use crate::{MAX_NAME_LEN, MAX_UNIT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit label. Empty is allowed.
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    if unit.trim().chars().count() > MAX_UNIT_LEN {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates the data for a new item.
pub fn validate_new_item(data: &NewItem) -> ValidationResult<()> {
    validate_item_name(&data.name)?;
    validate_unit(&data.unit)
}

/// Validates the fields a patch sets; unset fields are not checked.
pub fn validate_patch(patch: &ItemPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_item_name(name)?;
    }
    if let Some(unit) = &patch.unit {
        validate_unit(unit)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
