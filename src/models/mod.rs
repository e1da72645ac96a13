pub mod movie;
pub mod recommendation;
pub mod share;

pub use movie::{Movie, MovieId};
pub use recommendation::{RawCandidate, Recommendation, RecommendationReason};
pub use share::{ReceivedShare, SentShare, ShareRecord, ShareRequest};
