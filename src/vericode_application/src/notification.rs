use secrecy::ExposeSecret;
use url::form_urlencoded;
use vericode_core::{Email, Purpose, VerificationCode, VerificationSettings};

/// Subject and plain-text body handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn compose(
        purpose: Purpose,
        recipient: &Email,
        code: &VerificationCode,
        settings: &VerificationSettings,
    ) -> Self {
        let ttl_minutes = settings.for_purpose(purpose).ttl_minutes;
        match purpose {
            Purpose::EmailVerification => Self {
                subject: format!("{} - Email verification", settings.system_name),
                body: format!(
                    "Your verification code is {}. It is valid for {} minutes.\n\
                     If you did not request this, you can ignore this message.",
                    code.as_str(),
                    ttl_minutes
                ),
            },
            Purpose::PasswordReset => Self {
                subject: format!("{} - Password reset", settings.system_name),
                body: format!(
                    "Open the following link to reset your password:\n{}\n\
                     The link is valid for {} minutes. If you did not request a reset, \
                     ignore this message and your password will stay unchanged.",
                    reset_link(&settings.server_address, recipient, code),
                    ttl_minutes
                ),
            },
        }
    }
}

/// `{server_address}/user/reset?email=..&token=..` with both values
/// form-urlencoded, so `+`, `&` and `%` in the address survive the round trip.
pub fn reset_link(server_address: &str, recipient: &Email, token: &VerificationCode) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", recipient.as_ref().expose_secret())
        .append_pair("token", token.as_str())
        .finish();

    format!(
        "{}/user/reset?{}",
        server_address.trim_end_matches('/'),
        query
    )
}
