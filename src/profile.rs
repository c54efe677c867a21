// SPDX-License-Identifier: GPL-3.0-only

//! User profile shown on the profile page
//!
//! Lives in memory only; edits last for the process.

use crate::errors::ProfileError;
use crate::notify::{Notice, Severity};
use tracing::info;

/// The signed-in customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    customer_usi: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Kiran Patel".to_string(),
            email: "kiran.patel.@ftr.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            customer_usi: "202401234".to_string(),
        }
    }
}

/// Values submitted from the edit form
///
/// `None` leaves a field as it was, the way a pre-filled form does when the
/// user does not touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserProfile {
    /// Customer identifier; not editable
    pub fn customer_usi(&self) -> &str {
        &self.customer_usi
    }

    /// Apply an edit
    ///
    /// Name and email must end up non-blank. A blank phone keeps the current
    /// number. Nothing changes when validation fails.
    pub fn apply(&mut self, edit: ProfileEdit) -> Result<Notice, ProfileError> {
        let name = edit.name.unwrap_or_else(|| self.name.clone());
        let email = edit.email.unwrap_or_else(|| self.email.clone());
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(ProfileError::MissingRequired);
        }

        self.name = name.trim().to_string();
        self.email = email.trim().to_string();
        if let Some(phone) = edit.phone.filter(|p| !p.trim().is_empty()) {
            self.phone = phone.trim().to_string();
        }

        info!(name = %self.name, "Profile updated");
        Ok(Notice::toast("Profile updated successfully!", Severity::Success))
    }
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name:         {}", self.name)?;
        writeln!(f, "Email:        {}", self.email)?;
        writeln!(f, "Phone:        {}", self.phone)?;
        write!(f, "Customer USI: {}", self.customer_usi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_fields_are_kept() {
        let mut profile = UserProfile::default();
        let notice = profile
            .apply(ProfileEdit {
                name: Some("Ada Lovelace".into()),
                ..ProfileEdit::default()
            })
            .unwrap();
        assert_eq!(notice.message(), "Profile updated successfully!");
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.email, UserProfile::default().email);
    }

    #[test]
    fn test_blank_required_field_rejected() {
        let mut profile = UserProfile::default();
        let before = profile.clone();
        let err = profile
            .apply(ProfileEdit {
                name: Some("New Name".into()),
                email: Some("   ".into()),
                phone: Some("555".into()),
            })
            .unwrap_err();
        assert_eq!(err, ProfileError::MissingRequired);
        assert_eq!(profile, before);
    }
}
