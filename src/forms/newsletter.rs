use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{lenient, normalized_email, FieldErrors};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewsletterForm {
    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
}

impl NewsletterForm {
    pub fn validate_form(&self) -> Result<NewsletterSignup, FieldErrors> {
        let email = normalized_email(&self.email);
        FieldErrors::from_rules(&Self {
            email: email.clone(),
        })
        .into_result(|| NewsletterSignup { email })
    }
}
