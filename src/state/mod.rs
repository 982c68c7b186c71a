/// State management module
///
/// This module holds all session-scoped application state:
/// - Wire/data model shared with the remote service (data.rs)
/// - The ranking session controller: view mode, pair slots,
///   vote marker, progress snapshot (session.rs)
/// - The in-memory image cache keyed by id and resolution tier (images.rs)

pub mod data;
pub mod images;
pub mod session;
