/// Database models
///
/// One module per table, each pairing the record struct with its CRUD
/// operations:
///
/// - `user`: accounts and the closed [`user::Role`] set
/// - `course`: top-level content containers with unique slugs
/// - `module`: ordered sections within a course
/// - `lesson`: ordered content leaves within a module
///
/// The hierarchy is Course → Module → Lesson with cascading deletes;
/// `ord` columns fix display order within the parent scope.
pub mod course;
pub mod lesson;
pub mod module;
pub mod user;
