//! Raised conditions: panics carrying a runtime [`Kind`].
//!
//! A test signals an error condition by panicking. Plain `panic!` payloads are
//! classified as [`PANIC`]; [`raise`] panics with a [`Raised`] payload that
//! carries an explicit kind. Kinds can extend a parent kind, and matching with
//! [`Kind::is_a`] walks that chain.

use std::any::Any;
use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

/// Runtime tag of a raised condition.
///
/// Kinds are meant to live in `static`s so that children can point at their
/// parent:
///
/// ```
/// use mftr::raised::{Kind, RANGE_ERROR};
///
/// static INDEX_OUT_OF_BOUNDS: Kind = Kind::extends("IndexOutOfBounds", &RANGE_ERROR);
///
/// assert!(INDEX_OUT_OF_BOUNDS.is_a(&RANGE_ERROR));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Kind {
    name: &'static str,
    parent: Option<&'static Kind>,
}

/// Any panic that was not raised through [`raise`].
pub static PANIC: Kind = Kind::new("Panic");
pub static ERROR: Kind = Kind::new("Error");
pub static RANGE_ERROR: Kind = Kind::extends("RangeError", &ERROR);
pub static TYPE_ERROR: Kind = Kind::extends("TypeError", &ERROR);

impl Kind {
    pub const fn new(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    pub const fn extends(name: &'static str, parent: &'static Kind) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&'static Kind> {
        self.parent
    }

    /// True if `self` is `other` or one of its descendants.
    #[must_use]
    pub fn is_a(&self, other: &Kind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent;
        }
        false
    }

    /// Indefinite article for the kind name.
    #[must_use]
    pub fn article(&self) -> &'static str {
        article(self.name)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o') => "an",
        _ => "a",
    }
}

/// A caught panic, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    kind: &'static Kind,
    message: String,
}

impl Raised {
    pub fn new(kind: &'static Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classifies an unwinding payload as returned by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Raised>() {
            Ok(raised) => return *raised,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::new(&PANIC, *message),
            Err(payload) => payload,
        };
        match payload.downcast_ref::<&'static str>() {
            Some(message) => Self::new(&PANIC, *message),
            None => Self::new(&PANIC, "Box<dyn Any>"),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static Kind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Raised {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Raised {}

/// Raise a condition of the given kind.
#[cold]
#[track_caller]
pub fn raise(kind: &'static Kind, message: impl Into<String>) -> ! {
    panic::panic_any(Raised::new(kind, message))
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

// Installed once; defers to the previous hook unless the panicking thread is
// inside `catch_silently`
fn install_silencing_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_silenced() {
                previous(info);
            }
        }));
    });
}

pub(crate) fn is_silenced() -> bool {
    SILENCED.with(Cell::get)
}

/// Runs `f`, turning a panic into a [`Raised`].
///
/// A panic caught here leaves no trace on stderr. Panics on other threads, and
/// outside `f`, still reach the panic hook.
pub fn catch_silently<R>(f: impl FnOnce() -> R) -> Result<R, Raised> {
    install_silencing_hook();

    let outer = SILENCED.with(|silenced| silenced.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|silenced| silenced.set(outer));

    result.map_err(Raised::from_payload)
}
