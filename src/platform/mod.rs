//! Page abstraction layer
//!
//! The zone sees the document through a [`Page`]:
//! - Container markup (read and wholesale replace)
//! - Marker-class lookup, recomputed on every call
//! - Editability and input-handler attachment per element
//! - Reload
//!
//! `WebPage` drives the live DOM on wasm32. `MemoryPage` models a flat
//! fragment in memory for tests and the native demo.

#[cfg(not(target_arch = "wasm32"))]
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use memory::{ElementId, MemoryPage};
#[cfg(target_arch = "wasm32")]
pub use web::WebPage;

use std::rc::Rc;

use thiserror::Error;

/// Callback run on every input event of an editable element
pub type InputHandler = Rc<dyn Fn()>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("no element with id `{0}`")]
    ContainerMissing(String),
    #[error("page rejected the operation: {0}")]
    Rejected(String),
}

pub trait Page {
    /// Handle to one element of the current document
    type Element;

    fn container_markup(&self, container_id: &str) -> Result<String, PageError>;

    /// Overwrite the container's inner markup. Every element inside the
    /// container is replaced, so editability and handlers are lost.
    fn replace_container_markup(&mut self, container_id: &str, markup: &str)
    -> Result<(), PageError>;

    /// Every element currently carrying `marker_class`, in document order.
    /// Never cached: a markup replacement changes the answer.
    fn query_marked(&self, marker_class: &str) -> Vec<Self::Element>;

    fn set_editable(&mut self, element: &Self::Element);

    fn is_editable(&self, element: &Self::Element) -> bool;

    /// Whether this element instance already has a handler from the zone
    fn has_input_handler(&self, element: &Self::Element) -> bool;

    fn attach_input_handler(&mut self, element: &Self::Element, handler: InputHandler);

    /// Start a full page reload
    fn reload(&mut self);
}
