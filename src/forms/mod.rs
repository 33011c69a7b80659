//! Form specifications: ordered field descriptors with rendering attributes and
//! validators. Forms are built per request and serialized for the view layer.

mod posts;
mod validation;

pub use posts::PostsForm;
pub use validation::Validator;

use crate::error::AppError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Hidden,
    Text,
    Radio,
    Textarea,
    Submit,
}

#[derive(Clone, Debug, Serialize)]
pub struct Element {
    /// Unique name inside the form.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// HTML attributes. A `name` attribute overrides the submitted field name.
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Element {
    pub fn new(kind: ElementKind, name: &str) -> Self {
        Element {
            name: name.to_string(),
            kind,
            attributes: BTreeMap::new(),
            value: None,
            validators: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Name of the submitted field this element reads.
    pub fn field_name(&self) -> &str {
        self.attributes.get("name").map(String::as_str).unwrap_or(&self.name)
    }

    pub fn is_checked(&self) -> bool {
        self.attributes.contains_key("checked")
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Form {
    pub elements: Vec<Element>,
}

impl Form {
    pub fn add(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every validator message for `data`, in element order.
    pub fn messages(&self, data: &HashMap<String, String>) -> Vec<String> {
        self.elements
            .iter()
            .flat_map(|e| {
                let value = data.get(e.field_name()).map(String::as_str);
                e.validators.iter().filter_map(move |v| v.check(e.field_name(), value))
            })
            .collect()
    }

    pub fn validate(&self, data: &HashMap<String, String>) -> Result<(), AppError> {
        let messages = self.messages(data);
        if messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(messages))
        }
    }
}
