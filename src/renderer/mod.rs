//! GPU rendering: the lit model pass and shared pipeline helpers.

pub mod model;
pub(crate) mod pipeline_util;

pub use model::{ModelRenderer, Vertex};
