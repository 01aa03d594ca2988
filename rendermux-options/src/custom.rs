//! Inspection of user-supplied extra arguments.
//!
//! Renderer profiles may carry custom ffmpeg options. Builders consult this
//! module before emitting a flag so a user-specified value is never
//! contradicted by a generated one.

/// Whether the custom argument list already specifies one of the given
/// flags.
///
/// Matching is by exact token, so `-c:v` does not match `-c:v:0`'s value or
/// a filename that merely contains the text.
pub fn custom_specifies(custom: &[String], flags: &[&str]) -> bool {
    custom
        .iter()
        .any(|token| flags.iter().any(|flag| token == flag))
}
