// storefront_app/src/web/flash.rs

//! One-shot user messages carried across a redirect in the `flash` cookie.

use actix_web::cookie::Cookie;
use actix_web::http::header::{LOCATION, SET_COOKIE};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};

pub const FLASH_COOKIE: &str = "flash";

/// 303 to `location`.
pub fn redirect(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((LOCATION, location)).finish()
}

/// 303 to `location`, leaving `message` for the next page.
///
/// The value is percent-encoded; actix decodes request cookies on parse, so
/// [`take_flash`] sees the original text.
pub fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
  let cookie = Cookie::build(FLASH_COOKIE, message.to_string()).path("/").http_only(true).finish();
  HttpResponse::SeeOther()
    .insert_header((LOCATION, location))
    .insert_header((SET_COOKIE, cookie.encoded().to_string()))
    .finish()
}

/// Reads the pending flash message, if any, and schedules its removal on
/// `response`.
pub fn take_flash(req: &HttpRequest, response: &mut HttpResponseBuilder) -> Option<String> {
  let cookie = req.cookie(FLASH_COOKIE)?;
  let mut removal = Cookie::new(FLASH_COOKIE, "");
  removal.set_path("/");
  removal.make_removal();
  response.cookie(removal);
  Some(cookie.value().to_string()).filter(|m| !m.is_empty())
}
