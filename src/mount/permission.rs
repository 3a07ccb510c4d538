//! # File Permission Parsing
//!
//! The driver sends the file mode as a decimal string (e.g. `"420"` for `0644`).

use super::error::MountError;
use crate::constants::DEFAULT_FILE_PERMISSION;

/// Parse the permission string of a Mount call into the protocol's file mode
///
/// An empty string selects [`DEFAULT_FILE_PERMISSION`]. Anything else must be a
/// decimal unsigned integer that fits the `int32` mode field.
pub fn parse_permission(permission: &str) -> Result<i32, MountError> {
    let permission = permission.trim();
    let mode = if permission.is_empty() {
        DEFAULT_FILE_PERMISSION
    } else {
        permission
            .parse::<u32>()
            .map_err(|source| MountError::InvalidPermission {
                value: permission.to_string(),
                source,
            })?
    };

    i32::try_from(mode).map_err(|source| MountError::PermissionOutOfRange { value: mode, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permission_decimal() {
        assert_eq!(parse_permission("420").unwrap(), 0o644);
        assert_eq!(parse_permission("256").unwrap(), 0o400);
    }

    #[test]
    fn test_parse_permission_empty_uses_default() {
        assert_eq!(parse_permission("").unwrap(), 0o644);
    }

    #[test]
    fn test_parse_permission_invalid() {
        for value in ["abc", "-1", "0o644", "4.2"] {
            let err = parse_permission(value).unwrap_err();
            assert!(
                matches!(err, MountError::InvalidPermission { .. }),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_permission_out_of_range() {
        let err = parse_permission("4294967295").unwrap_err();
        assert!(matches!(err, MountError::PermissionOutOfRange { .. }));
    }
}
