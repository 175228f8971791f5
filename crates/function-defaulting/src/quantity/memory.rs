use serde::{Deserialize, Serialize};

use crate::quantity::{Quantity, macros::forward_quantity_impls};

/// A [`Quantity`] on the memory axis, usually expressed in binary multiples (`128Mi`).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoryQuantity(Quantity);

forward_quantity_impls!(MemoryQuantity, "MemoryQuantity");
