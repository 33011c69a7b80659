//! Response helpers: the JSON success envelope and flash-or-JSON action replies.

use crate::cookies;
use crate::error::{AppError, ErrorBody};
use crate::flash::{Flash, FlashBag};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cookie::Cookie;
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data, meta: None }))
}

/// Outcome messages of an action, as returned to asynchronous callers.
#[derive(Serialize)]
pub struct ActionResult<'a> {
    pub messages: &'a [Flash],
}

/// Reply of a backend action: a JSON body for asynchronous requests, otherwise the
/// flash messages are stored in a cookie and the browser is redirected back.
pub struct ActionReply {
    is_async: bool,
    redirect_to: String,
    flash: FlashBag,
    error: Option<AppError>,
    cookies: Vec<Cookie<'static>>,
}

impl ActionReply {
    pub fn new(is_async: bool, redirect_to: impl Into<String>) -> Self {
        ActionReply {
            is_async,
            redirect_to: redirect_to.into(),
            flash: FlashBag::default(),
            error: None,
            cookies: Vec::new(),
        }
    }

    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.flash.success(message);
        self
    }

    /// One error flash per message of `err`.
    pub fn failure(mut self, err: AppError) -> Self {
        tracing::warn!(code = err.code(), error = %err, "action failed");
        for message in err.messages() {
            self.flash.error(message);
        }
        self.error = Some(err);
        self
    }

    /// Failure reported with a fixed message instead of the error's own.
    pub fn failure_with(mut self, err: AppError, message: impl Into<String>) -> Self {
        tracing::warn!(code = err.code(), error = %err, "action failed");
        self.flash.error(message);
        self.error = Some(err);
        self
    }

    pub fn cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl IntoResponse for ActionReply {
    fn into_response(self) -> Response {
        let mut response = if self.is_async {
            match &self.error {
                Some(err) => {
                    let mut body = ErrorBody::from(err);
                    body.error.details = Some(serde_json::json!({ "messages": self.flash.messages() }));
                    (err.status(), Json(body)).into_response()
                }
                None => success_one_ok(ActionResult {
                    messages: self.flash.messages(),
                })
                .into_response(),
            }
        } else {
            let mut response = StatusCode::SEE_OTHER.into_response();
            match HeaderValue::from_str(&self.redirect_to) {
                Ok(location) => {
                    response.headers_mut().insert(header::LOCATION, location);
                }
                Err(_) => {
                    response.headers_mut().insert(header::LOCATION, HeaderValue::from_static("/"));
                }
            }
            if !self.flash.is_empty() {
                if let Some(v) = cookies::header_value(&self.flash.to_cookie()) {
                    response.headers_mut().append(header::SET_COOKIE, v);
                }
            }
            response
        };
        for cookie in &self.cookies {
            if let Some(v) = cookies::header_value(cookie) {
                response.headers_mut().append(header::SET_COOKIE, v);
            }
        }
        response
    }
}
