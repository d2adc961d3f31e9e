//! Origin tags prefixed to log messages.
//!
//! # Design
//! - Two tagging strategies: caller-declared (`OriginTag::of::<T>()` or an explicit
//!   label) and value-derived (`OriginTag::of_val(&value)`).
//! - Type names are shortened to their last path segment so tags stay readable.

use std::any;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Label identifying the component that emitted a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginTag(Cow<'static, str>);

impl OriginTag {
    /// Tag with an explicit label.
    #[must_use]
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(label.into())
    }

    /// Tag naming the type `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Owned(short_type_name(any::type_name::<T>())))
    }

    /// Tag naming the type of `value` as seen at the call site.
    ///
    /// Trait objects are tagged with their `dyn Trait` name.
    #[must_use]
    pub fn of_val<T: ?Sized>(value: &T) -> Self {
        Self(Cow::Owned(short_type_name(any::type_name_of_val(value))))
    }

    /// The label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OriginTag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Prefix `message` with the tag: `"<tag> - <message>"`.
#[must_use]
pub fn format_for_context(tag: &OriginTag, message: &str) -> String {
    format!("{tag} - {message}")
}

/// Strip module paths from every segment of a fully qualified type name.
///
/// `alloc::vec::Vec<my_app::Job>` becomes `Vec<Job>`.
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0usize;
    let mut chars = full.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push(ch);
            segment_start = out.len();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Worker;

    mod nested {
        pub(super) struct Job<T>(pub(super) T);
    }

    #[test]
    fn short_type_name_strips_paths() {
        assert_eq!(short_type_name("a::b::Foo"), "Foo");
        assert_eq!(short_type_name("Foo"), "Foo");
        assert_eq!(
            short_type_name("a::Foo<c::Bar, d::e::Baz>"),
            "Foo<Bar, Baz>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(short_type_name("dyn core::error::Error"), "dyn Error");
        assert_eq!(short_type_name("(u8, alloc::string::String)"), "(u8, String)");
    }

    #[test]
    fn type_tags_use_short_names() {
        let _worker = Worker;
        assert_eq!(OriginTag::of::<Worker>().as_str(), "Worker");
        assert_eq!(
            OriginTag::of::<nested::Job<Worker>>().as_str(),
            "Job<Worker>"
        );
        assert_eq!(OriginTag::of::<String>().as_str(), "String");
    }

    #[test]
    fn value_tags_follow_the_static_type() {
        let job = nested::Job(7_u32);
        assert_eq!(OriginTag::of_val(&job).as_str(), "Job<u32>");
        let _ = job.0;

        let err: Box<dyn std::error::Error> = "boom".into();
        assert_eq!(OriginTag::of_val(err.as_ref()).as_str(), "dyn Error");
    }

    #[test]
    fn format_for_context_prefixes_the_tag() {
        let tag = OriginTag::new("Scheduler");
        assert_eq!(format_for_context(&tag, "tick"), "Scheduler - tick");
        assert_eq!(tag.to_string(), "Scheduler");
    }
}
