//! One-time messages carried across a redirect.
//!
//! The cookie only holds a message code; the text is resolved on the next
//! rendered view and the cookie is removed there.

use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flash {
    ItemSaved,
    ItemUpdated,
    ItemDeleted,
    DeleteFailed,
}

/// Rendered form of a flash message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashBody {
    pub level: FlashLevel,
    pub message: &'static str,
}

impl Flash {
    const ALL: [Flash; 4] = [
        Flash::ItemSaved,
        Flash::ItemUpdated,
        Flash::ItemDeleted,
        Flash::DeleteFailed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Flash::ItemSaved => "item_saved",
            Flash::ItemUpdated => "item_updated",
            Flash::ItemDeleted => "item_deleted",
            Flash::DeleteFailed => "delete_failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn level(self) -> FlashLevel {
        match self {
            Flash::DeleteFailed => FlashLevel::Error,
            _ => FlashLevel::Success,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::ItemSaved => "Data saved successfully!",
            Flash::ItemUpdated => "Data updated successfully!",
            Flash::ItemDeleted => "Data deleted successfully!",
            Flash::DeleteFailed => crate::app::services::failures::DELETE,
        }
    }

    pub fn body(self) -> FlashBody {
        FlashBody {
            level: self.level(),
            message: self.message(),
        }
    }

    fn cookie(self) -> Cookie<'static> {
        Cookie::build((FLASH_COOKIE, self.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// `303 See Other` to `location`, carrying `flash` for the next view.
pub fn redirect(cookies: &Cookies, location: &str, flash: Flash) -> Response {
    cookies.add(flash.cookie());
    Redirect::to(location).into_response()
}

/// Consume the pending flash message.
///
/// The cookie is removed whether or not it holds a known code.
pub fn take(cookies: &Cookies) -> Option<Flash> {
    let cookie = cookies.get(FLASH_COOKIE)?;
    let flash = Flash::from_code(cookie.value().trim());
    cookies.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    flash
}
