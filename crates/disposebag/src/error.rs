#![forbid(unsafe_code)]

use std::fmt;

/// Errors from building a [`DisposeBag`](crate::DisposeBag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagError {
    /// The lifecycle owner no longer exists, so the bag could never be
    /// disposed by a lifecycle event.
    OwnerDropped,
}

impl fmt::Display for BagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerDropped => write!(f, "lifecycle owner has been dropped"),
        }
    }
}

impl std::error::Error for BagError {}
