pub mod prelude;

pub mod attendance;
pub mod conference;
pub mod conference_topic;
pub mod profile;
pub mod session;
pub mod session_speaker_link;
pub mod session_type;
pub mod speaker;
pub mod speaker_session_link;
pub mod user;
pub mod user_access_key;
pub mod wishlist_entry;
