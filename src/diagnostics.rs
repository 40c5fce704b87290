//! Recoverable input issues observed during a decode.
//!
//! Each diagnostic is kept on the decode result and mirrored to the `log`
//! facade at `warn` level.

use alloc::vec::Vec;

/// A tolerated inconsistency the decoder corrected or worked around.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The declared file size only covered the headers; it was replaced.
    FileSizeRepaired { declared: u32, repaired: u32 },
    /// The declared file size exceeded the input and was clamped to it.
    FileSizeClamped { declared: u32, available: u32 },
    /// Rows did not fit at 4-byte alignment; unpadded rows were assumed.
    AlignmentAssumption {
        padded_row_bytes: usize,
        unpadded_row_bytes: usize,
    },
}

/// Collector passed through a single decode call.
#[derive(Clone, Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::FileSizeRepaired { declared, repaired } => {
                log::warn!("COOL file size {declared} covers only the headers, using {repaired}");
            }
            Diagnostic::FileSizeClamped {
                declared,
                available,
            } => {
                log::warn!("COOL file size {declared} exceeds input, clamped to {available}");
            }
            Diagnostic::AlignmentAssumption {
                padded_row_bytes,
                unpadded_row_bytes,
            } => {
                log::warn!(
                    "COOL rows of {padded_row_bytes} bytes do not fit, \
                     assuming unpadded rows of {unpadded_row_bytes}"
                );
            }
        }
        self.items.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
