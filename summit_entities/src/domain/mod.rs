pub mod conference;
pub mod links;
pub mod profile;
pub mod session;
pub mod session_type;
pub mod speaker;

pub use links::{ConferenceLink, LinkState, SessionLink, SpeakerLink};
