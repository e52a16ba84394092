use crate::{contract::FieldContract, path::TypePath};
use sha2::{Digest, Sha256};
use std::fmt;

///
/// ShapeFingerprint
///
/// Stable digest of a shape's view type and ordered slot layout.
///

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct ShapeFingerprint([u8; 32]);

impl ShapeFingerprint {
    #[must_use]
    pub fn of(view: &TypePath, fields: &[FieldContract]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(view.as_str().as_bytes());
        for field in fields {
            hasher.update([0]);
            hasher.update(field.name.as_bytes());
            hasher.update([0]);
            hasher.update(field.value_type.to_string().as_bytes());
        }

        Self(hasher.finalize().into())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ShapeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShapeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // first 8 bytes are enough to tell shapes apart in logs
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
