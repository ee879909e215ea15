use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use super::{InputHandler, Page, PageError};

/// [`Page`] over the live browser document
pub struct WebPage {
    document: Document,
    /// Elements that already carry a zone input listener. Weak, so
    /// elements dropped by a markup replacement fall out on their own.
    handled: js_sys::WeakSet,
}

impl WebPage {
    pub fn current() -> Result<Self, PageError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PageError::Rejected("no document".to_string()))?;
        Ok(Self {
            document,
            handled: js_sys::WeakSet::new(),
        })
    }

    fn container(&self, container_id: &str) -> Result<web_sys::Element, PageError> {
        self.document
            .get_element_by_id(container_id)
            .ok_or_else(|| PageError::ContainerMissing(container_id.to_string()))
    }
}

impl Page for WebPage {
    type Element = HtmlElement;

    fn container_markup(&self, container_id: &str) -> Result<String, PageError> {
        Ok(self.container(container_id)?.inner_html())
    }

    fn replace_container_markup(
        &mut self,
        container_id: &str,
        markup: &str,
    ) -> Result<(), PageError> {
        self.container(container_id)?.set_inner_html(markup);
        Ok(())
    }

    fn query_marked(&self, marker_class: &str) -> Vec<HtmlElement> {
        // Live collection; snapshot it before anything mutates the DOM
        let collection = self.document.get_elements_by_class_name(marker_class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn set_editable(&mut self, element: &HtmlElement) {
        element.set_content_editable("true");
    }

    fn is_editable(&self, element: &HtmlElement) -> bool {
        element.is_content_editable()
    }

    fn has_input_handler(&self, element: &HtmlElement) -> bool {
        self.handled.has(element)
    }

    fn attach_input_handler(&mut self, element: &HtmlElement, handler: InputHandler) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handler();
        });
        match element.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
        {
            Ok(()) => {
                self.handled.add(element);
                // The listener lives as long as the element
                closure.forget();
            }
            Err(e) => log::warn!("Could not attach input listener: {:?}", e),
        }
    }

    fn reload(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                log::warn!("Reload failed: {:?}", e);
            }
        }
    }
}
