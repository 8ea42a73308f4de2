//! Certificate gallery entry stored in the local `certificates` list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    /// Image reference rendered by the gallery.
    pub image: String,
}
