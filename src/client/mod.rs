//! Client-side timeline model.
//!
//! Everything a gallery front-end needs, independent of any UI framework:
//! the form draft, the observable store and the backends it can use.

mod backend;
mod form;
mod http;
mod stats;
mod store;

pub use backend::{LocalBackend, TimelineBackend};
pub use form::{MomentDraft, MAX_DESCRIPTION_CHARS};
pub use http::HttpBackend;
pub use stats::{moment_count_label, TimelineStats, RECENT_WINDOW_DAYS};
pub use store::{
    MembershipPanel, Notice, NoticeLevel, TimelineEvent, TimelineState, TimelineStore,
};
