use greentick_types::BusinessProfile;

use super::{Notices, Phase};
use crate::client::{ApiClient, ApiResponse};

/// Business profile form of the logged-in user
#[derive(Debug)]
pub struct ProfileController {
    api: ApiClient,
    pub business_name: String,
    pub business_whatsapp: String,
    phase: Phase,
    notices: Notices,
}

impl ProfileController {
    /// Form prefilled from the session user
    pub fn new(api: ApiClient) -> Self {
        let user = api.session().user().unwrap_or_default();
        Self {
            business_name: user.business_name.unwrap_or_default(),
            business_whatsapp: user.business_whatsapp.unwrap_or_default(),
            api,
            phase: Phase::Idle,
            notices: Notices::default(),
        }
    }

    /// Load the backend's copy of the profile into the form.
    pub async fn on_visible(&mut self) {
        self.phase = Phase::Loading;
        match self.api.business_profile().await {
            Ok(profile) => {
                if let Some(name) = profile.business_name {
                    self.business_name = name;
                }
                if let Some(number) = profile.business_whatsapp {
                    self.business_whatsapp = number;
                }
            }
            Err(e) => self.notices.report("Failed to load profile data", &e),
        }
        self.phase = Phase::Loaded;
    }

    /// Send the form and fold the result into the session user.
    ///
    /// A reply without a body folds in the submitted fields instead.
    pub async fn save(&mut self) -> bool {
        let profile = BusinessProfile {
            business_name: Some(self.business_name.clone()),
            business_whatsapp: Some(self.business_whatsapp.clone()),
            ..Default::default()
        };
        let patch = match self.api.update_business_profile(&profile).await {
            Ok(ApiResponse::Data(body)) => body,
            Ok(ApiResponse::NoContent) => match serde_json::to_value(&profile) {
                Ok(fields) => fields,
                Err(e) => {
                    self.notices.error(format!("Failed to update profile: {}", e));
                    return false;
                }
            },
            Err(e) => {
                self.notices.report("Failed to update profile", &e);
                return false;
            }
        };

        let session = self.api.session();
        if let Some(user) = session.user() {
            match user.merged_with(patch) {
                Ok(updated) => session.update(Some(updated)),
                Err(e) => {
                    self.notices.error(format!("Failed to update profile: {}", e));
                    return false;
                }
            }
        }
        self.notices.success("Profile updated successfully.");
        true
    }

    /// Read-only account email
    pub fn email(&self) -> String {
        self.api
            .session()
            .user()
            .map(|u| u.email)
            .unwrap_or_default()
    }

    /// Read-only contact phone
    pub fn phone(&self) -> Option<String> {
        self.api.session().user().and_then(|u| u.phone)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
