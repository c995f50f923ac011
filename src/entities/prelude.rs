pub use super::admin_users::Entity as AdminUsers;
pub use super::contact_messages::Entity as ContactMessages;
pub use super::event_registrations::Entity as EventRegistrations;
pub use super::events::Entity as Events;
pub use super::members::Entity as Members;
