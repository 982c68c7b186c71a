/// Remote ranking service module
///
/// This module wraps the HTTP+JSON ranking service in typed async calls:
/// - Directory scanning and pair generation (client.rs)
/// - Vote recording and progress stats (client.rs)
/// - Review list, file moves, and image bytes (client.rs)

pub mod client;
