//! Fixed replies.

use aria_core::Persona;

pub const NOT_READY: &str = "Knowledge base is not yet ready. Please try again shortly.";
pub const CONTACT_REQUEST: &str = "Of course! Could you please share your full name, phone number, and email address so our team can reach out to you?";
pub const CONTACT_RETRY: &str = "I couldn't catch all your details. Could you please share your full name, phone number, and email together?";
pub const CONTACT_SAVE_FAILED: &str = "Internal server error while saving contact.";
pub const INTERNAL_ERROR: &str = "Internal server error.";
pub const NO_ANSWER: &str = "Sorry, I couldn't find relevant information.";

pub fn greeting(persona: &Persona) -> String {
    format!(
        "Hi, I'm {}, your AI assistant at {}. How can I assist you today?",
        persona.assistant_name, persona.organization
    )
}

pub fn restricted(persona: &Persona) -> String {
    format!(
        "I can only answer questions related to {}'s products, services, and AI solutions.",
        persona.organization
    )
}

pub fn contact_confirmation(name: &str, email: &str) -> String {
    format!(
        "Thank you, {}! Our team will reach out to you soon at {}.",
        name.trim(),
        email.trim()
    )
}
