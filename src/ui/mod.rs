/// User interface module
///
/// One view function per screen, plus the screen-local UI state the
/// controller does not care about (input fields, busy flags, inline
/// errors). Views are pure renderings of controller state that emit
/// intent messages back to the update loop; they never mutate anything.

pub mod rank;
pub mod review;
pub mod scan;
