// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for conditioning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing conditioning output.
///
/// Degenerate geometry and unrecognized labels are not errors: they resolve
/// to empty artifacts, defaults or warnings.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
