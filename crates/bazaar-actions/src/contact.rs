//! Contact form submission.

use crate::{ActionError, ActionResult, Shop};
use bazaar_commerce::contact::{ContactForm, ContactMessage};
use bazaar_store::DocumentStoreExt;
use chrono::Utc;
use tracing::{debug, error, info, instrument};

pub const MESSAGE_SENT: &str = "Thank you! Your message has been sent";

impl Shop {
    /// Validate and store a contact message. Every accepted submission
    /// creates a new document.
    #[instrument(skip_all)]
    pub async fn submit_contact(&self, form: &ContactForm) -> ActionResult<ContactMessage> {
        let message = match ContactMessage::from_form(form, Utc::now()) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "Contact form rejected");
                return ActionError::from(e).into();
            }
        };

        match self
            .store
            .create_as(ContactMessage::DOC_TYPE, &message)
            .await
        {
            Ok(_) => {
                info!(id = %message.id, "Contact message received");
                ActionResult::ok(MESSAGE_SENT, message)
            }
            Err(e) => {
                error!(error = %e, "Failed to store contact message");
                ActionResult::failure(
                    crate::ErrorKind::Persistence,
                    format!("Failed to send message: {}", e),
                )
            }
        }
    }
}
