// Template context structures for Askama templates, organized by page area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{Permissions, get_permissions, get_username, take_flash};

pub const DEFAULT_APP_NAME: &str = "Clothing Collection";
pub const DEFAULT_CLAIM: &str = "where every donation fits and passes on warmth";

/// Common context shared by all pages, public and admin.
/// Templates access these as `ctx.app_name`, `ctx.csrf_token`, etc.
pub struct PageContext {
    /// Signed-in administrator, if any.
    pub username: Option<String>,
    pub permissions: Permissions,
    pub flash: Option<String>,
    pub app_name: String,
    pub claim: String,
    pub csrf_token: String,
    pub year: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        Self {
            username: get_username(session).ok(),
            permissions: get_permissions(session),
            flash: take_flash(session),
            app_name: DEFAULT_APP_NAME.to_string(),
            claim: DEFAULT_CLAIM.to_string(),
            csrf_token: csrf::get_or_create_token(session),
            year: chrono::Local::now().format("%Y").to_string(),
        }
    }
}

mod common;
mod donation;

pub use self::common::{LoginTemplate, SettingsTemplate};
pub use self::donation::{
    ChoiceOption, DonationConfirmationTemplate, DonationFormTemplate, DonationListTemplate,
};
