//! Presentation state for the two screens of the app.
//!
//! # Design
//! Views own their local state and talk to the API only through a
//! `Session`, one request per user action. After a mutation they adopt the
//! server's representation wholesale; nothing is merged optimistically. A
//! failed call sets a banner message and leaves the rest of the state alone.
//!
//! `render` produces plain text so a terminal host can print a view as is.

mod dashboard;
mod detail;

pub use dashboard::{CreateDialog, Dashboard, ListCard};
pub use detail::Detail;

fn banner(out: &mut String, error: Option<&str>) {
    if let Some(error) = error {
        out.push_str(&format!("! {error}\n"));
    }
}
