pub use super::attendance::Entity as Attendance;
pub use super::conference::Entity as Conference;
pub use super::conference_topic::Entity as ConferenceTopic;
pub use super::profile::Entity as Profile;
pub use super::session::Entity as Session;
pub use super::session_speaker_link::Entity as SessionSpeakerLink;
pub use super::session_type::Entity as SessionType;
pub use super::speaker::Entity as Speaker;
pub use super::speaker_session_link::Entity as SpeakerSessionLink;
pub use super::user::Entity as User;
pub use super::user_access_key::Entity as UserAccessKey;
pub use super::wishlist_entry::Entity as WishlistEntry;
