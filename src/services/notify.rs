use std::sync::Arc;

use tracing::{error, info};

use crate::clients::mailer::{MailClient, OutboundEmail};
use crate::db::EventRecord;
use crate::entities::{contact_messages, event_registrations, members};

/// Best-effort notification dispatch.
///
/// Every send is spawned off the request path: a relay failure is logged
/// and never fails the business operation that triggered it, and the
/// user-facing and admin-facing sends fail independently.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<MailClient>,
}

impl Notifier {
    pub const fn new(mailer: Arc<MailClient>) -> Self {
        Self { mailer }
    }

    fn dispatch(&self, email: OutboundEmail) {
        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            match mailer.send(&email).await {
                Ok(()) => info!("Notification '{}' sent to {}", email.subject, email.to),
                Err(e) => error!(
                    "Failed to send '{}' to {}: {e:#}",
                    email.subject, email.to
                ),
            }
        });
    }

    pub fn application_received(&self, member: &members::Model) {
        self.dispatch(OutboundEmail {
            to: member.email.clone(),
            subject: "Application received".to_string(),
            html: format!(
                "<h2>Welcome!</h2>\
                 <p>Dear {},</p>\
                 <p>Thank you for applying. We have received your application \
                 and will review it within 2-3 business days.</p>\
                 <ul>\
                 <li><strong>Department:</strong> {}</li>\
                 <li><strong>Year:</strong> {}</li>\
                 </ul>",
                member.full_name, member.department, member.year
            ),
            reply_to: None,
        });

        self.dispatch(OutboundEmail {
            to: self.mailer.admin_address().to_string(),
            subject: "New membership application".to_string(),
            html: format!(
                "<h2>New membership application</h2>\
                 <ul>\
                 <li><strong>Name:</strong> {}</li>\
                 <li><strong>Email:</strong> {}</li>\
                 <li><strong>Phone:</strong> {}</li>\
                 <li><strong>Department:</strong> {}</li>\
                 <li><strong>Year:</strong> {}</li>\
                 <li><strong>Experience:</strong> {}</li>\
                 <li><strong>Motivation:</strong> {}</li>\
                 </ul>\
                 <p>Review this application in the admin panel.</p>",
                member.full_name,
                member.email,
                member.phone,
                member.department,
                member.year,
                member.experience.as_deref().unwrap_or("Not provided"),
                member.motivation.as_deref().unwrap_or("Not provided"),
            ),
            reply_to: None,
        });
    }

    /// Status-specific mail for approved/rejected; a reset to pending sends
    /// nothing.
    pub fn application_status_changed(&self, member: &members::Model, status: &str) {
        let (subject, html) = match status {
            "approved" => (
                "Application approved".to_string(),
                format!(
                    "<h2>Congratulations!</h2>\
                     <p>Dear {},</p>\
                     <p>Your membership application has been <strong>approved</strong>. \
                     We look forward to seeing you at the next meeting.</p>",
                    member.full_name
                ),
            ),
            "rejected" => (
                "Application update".to_string(),
                format!(
                    "<h2>Thank you for your interest</h2>\
                     <p>Dear {},</p>\
                     <p>After careful consideration we are unable to accept your \
                     application at this time. You are welcome to attend our public \
                     events and apply again in the future.</p>",
                    member.full_name
                ),
            ),
            _ => return,
        };

        self.dispatch(OutboundEmail {
            to: member.email.clone(),
            subject,
            html,
            reply_to: None,
        });
    }

    pub fn contact_received(&self, message: &contact_messages::Model) {
        self.dispatch(OutboundEmail {
            to: message.email.clone(),
            subject: "Message received".to_string(),
            html: format!(
                "<h2>Thank you for reaching out</h2>\
                 <p>Dear {},</p>\
                 <p>We have received your message and will respond within 24 hours.</p>\
                 <p><strong>Subject:</strong> {}</p>",
                message.name, message.subject
            ),
            reply_to: None,
        });

        self.dispatch(OutboundEmail {
            to: self.mailer.admin_address().to_string(),
            subject: format!("New contact form: {}", message.subject),
            html: format!(
                "<h2>New contact form submission</h2>\
                 <ul>\
                 <li><strong>Name:</strong> {}</li>\
                 <li><strong>Email:</strong> {}</li>\
                 <li><strong>Subject:</strong> {}</li>\
                 </ul>\
                 <p>{}</p>",
                message.name, message.email, message.subject, message.message
            ),
            reply_to: Some(message.email.clone()),
        });
    }

    pub fn registration_confirmed(
        &self,
        registration: &event_registrations::Model,
        event: &EventRecord,
    ) {
        self.dispatch(OutboundEmail {
            to: registration.email.clone(),
            subject: format!("Registration confirmed: {}", event.name),
            html: format!(
                "<h2>Registration confirmed!</h2>\
                 <p>Dear {},</p>\
                 <p>You are registered for the following event:</p>\
                 <ul>\
                 <li><strong>Event:</strong> {}</li>\
                 <li><strong>Date &amp; time:</strong> {}</li>\
                 <li><strong>Location:</strong> {}</li>\
                 </ul>",
                registration.name, event.name, event.schedule, event.location
            ),
            reply_to: None,
        });

        let capacity = event
            .max_participants
            .map_or_else(|| "Unlimited".to_string(), |m| m.to_string());

        self.dispatch(OutboundEmail {
            to: self.mailer.admin_address().to_string(),
            subject: format!("New registration: {}", event.name),
            html: format!(
                "<h2>New event registration</h2>\
                 <p><strong>{}</strong> - {}</p>\
                 <ul>\
                 <li><strong>Name:</strong> {}</li>\
                 <li><strong>Email:</strong> {}</li>\
                 <li><strong>Phone:</strong> {}</li>\
                 </ul>\
                 <p>Current registrations: {}/{}</p>",
                event.name,
                event.schedule,
                registration.name,
                registration.email,
                registration.phone.as_deref().unwrap_or("Not provided"),
                event.registered_count + 1,
                capacity
            ),
            reply_to: None,
        });
    }
}
