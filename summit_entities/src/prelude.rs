pub use crate::domain::conference::Conference;
pub use crate::domain::links::{ConferenceLink, LinkState, SessionLink, SpeakerLink};
pub use crate::domain::profile::{Profile, TeeShirtSize};
pub use crate::domain::session::Session;
pub use crate::domain::session_type::SessionType;
pub use crate::domain::speaker::Speaker;
pub use crate::error::EntityError;
pub use crate::queries::{
    build_conference_query, build_session_query, ConferenceQuery, FilterClause, FilterError,
    SessionQuery,
};
