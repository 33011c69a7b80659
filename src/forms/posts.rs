use super::{Element, ElementKind, Form, Validator};
use crate::models::{Entity, Post};

pub const TITLE_REQUIRED: &str = "The title is required.";
pub const CONTENT_REQUIRED: &str = "content is required.";
pub const CSRF_FAILED: &str = "CSRF validation failed";

/// Create/edit form of a post.
pub struct PostsForm;

impl PostsForm {
    /// Edit mode (`Some(post)`) adds the hidden id and pre-populates values.
    pub fn build(entity: Option<&Post>) -> Form {
        let mut form = Form::default();

        if let Some(post) = entity {
            form.add(Element::new(ElementKind::Hidden, "id").value(post.id().to_string()));
        }

        let mut title = Element::new(ElementKind::Text, "title")
            .attr("placeholder", "Title")
            .attr("class", "form-control")
            .attr("required", "required")
            .validator(Validator::presence_of(TITLE_REQUIRED));
        if let Some(post) = entity {
            title = title.value(post.title());
        }
        form.add(title);

        let mut locked = Element::new(ElementKind::Radio, "locked").attr("name", "locked").value("Y");
        let mut unlocked = Element::new(ElementKind::Radio, "unLocked").attr("name", "locked").value("N");
        match entity {
            None => unlocked = unlocked.attr("checked", "checked"),
            Some(post) if post.locked() == "N" => unlocked = unlocked.attr("checked", "checked"),
            Some(post) if post.locked() == "Y" => locked = locked.attr("checked", "checked"),
            Some(_) => {}
        }
        form.add(locked).add(unlocked);

        let mut content = Element::new(ElementKind::Textarea, "content")
            .attr("data-provide", "markdown")
            .attr("data-iconlibrary", "fa")
            .attr("required", "required")
            .attr("rows", "15")
            .validator(Validator::presence_of(CONTENT_REQUIRED));
        if let Some(post) = entity {
            content = content.value(post.content());
        }
        form.add(content);

        form.add(
            Element::new(ElementKind::Text, "tags")
                .attr("placeholder", "Tags")
                .attr("class", "form-control")
                .attr("required", "required"),
        );
        form.add(Element::new(ElementKind::Hidden, "object"));

        let mut kind = Element::new(ElementKind::Hidden, "type");
        if let Some(post) = entity {
            kind = kind.value(post.kind());
        }
        form.add(kind);
        form.add(Element::new(ElementKind::Hidden, "csrf"));

        form.add(
            Element::new(ElementKind::Submit, "save")
                .attr("class", "btn btn-sm btn-success pull-right")
                .value("Submit Post"),
        );
        form.add(
            Element::new(ElementKind::Submit, "saveDraft")
                .attr("class", "btn btn-sm btn-primary pull-left")
                .value("Save Draft"),
        );
        form
    }

    /// Require the submitted `csrf` field to equal `token`.
    pub fn with_csrf(mut form: Form, token: &str) -> Form {
        if let Some(csrf) = form.get_mut("csrf") {
            csrf.value = Some(token.to_string());
            csrf.validators.push(Validator::identical(token, CSRF_FAILED));
        }
        form
    }
}
