use crate::Result;
use async_trait::async_trait;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// How an element is located on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Element id attribute
    Id(&'static str),
    /// CSS selector
    Css(&'static str),
    /// A `<button>` whose text contains any of the given phrases
    ButtonText(&'static [&'static str]),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{}", id),
            Locator::Css(selector) => f.write_str(selector),
            Locator::ButtonText(phrases) => write!(f, "button containing {:?}", phrases),
        }
    }
}

/// State an element must be in before a wait is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Attached to the DOM
    Present,
    /// Attached and rendered with a non-empty box
    Visible,
    /// Visible and not disabled
    Clickable,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Present => f.write_str("present"),
            Condition::Visible => f.write_str("visible"),
            Condition::Clickable => f.write_str("clickable"),
        }
    }
}

/// Capabilities the lookup workflow needs from a controllable browser.
///
/// Implementations report an unusable session as
/// [`Error::SessionLost`](crate::Error::SessionLost); every other error is
/// treated as local to the current lookup.
#[async_trait]
pub trait BrowserSession: Send {
    type Element: Clone + Send + Sync;

    /// Load `url` in the session's page
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Check once, without waiting, for an element matching `locator` that
    /// satisfies `condition` in the current context.
    async fn probe(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> Result<Option<Self::Element>>;

    /// First descendant of `parent` matching `locator`, or `Error::NotFound`
    async fn find_child(
        &mut self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Self::Element>;

    /// All descendants of `parent` matching `locator`, in document order
    async fn find_children(
        &mut self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>>;

    async fn clear(&mut self, element: &Self::Element) -> Result<()>;

    async fn type_text(&mut self, element: &Self::Element, text: &str) -> Result<()>;

    /// Simulated pointer click
    async fn click(&mut self, element: &Self::Element) -> Result<()>;

    /// Invoke the element's activation directly, bypassing overlays that would
    /// intercept a pointer event
    async fn js_click(&mut self, element: &Self::Element) -> Result<()>;

    /// Rendered text of the element
    async fn text(&mut self, element: &Self::Element) -> Result<String>;

    /// Scope subsequent lookups to the embedded context rooted at `frame`.
    ///
    /// The context is an in-document container such as a consent overlay;
    /// cross-document `<iframe>` contents are not reachable through it.
    fn enter_frame(&mut self, frame: &Self::Element) -> Result<()>;

    /// Return to the top-level document
    fn leave_frame(&mut self) -> Result<()>;

    /// Tear the browser down
    async fn shutdown(&mut self) -> Result<()>;
}

/// Creates fresh browser sessions, initially and after a session is lost
#[async_trait]
pub trait SessionLauncher: Send {
    type Session: BrowserSession;

    async fn launch(&mut self) -> Result<Self::Session>;
}

/// An entered frame context that returns to the top-level document when
/// dropped, on every exit path.
pub struct FrameScope<'a, S: BrowserSession> {
    session: &'a mut S,
}

impl<'a, S: BrowserSession> FrameScope<'a, S> {
    pub fn enter(session: &'a mut S, frame: &S::Element) -> Result<Self> {
        session.enter_frame(frame)?;
        tracing::debug!("Switched into embedded frame context");
        Ok(Self { session })
    }
}

impl<S: BrowserSession> Deref for FrameScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.session
    }
}

impl<S: BrowserSession> DerefMut for FrameScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.session
    }
}

impl<S: BrowserSession> Drop for FrameScope<'_, S> {
    fn drop(&mut self) {
        match self.session.leave_frame() {
            Ok(()) => tracing::debug!("Switched back to top-level document"),
            Err(e) => tracing::warn!("Could not return to top-level document: {}", e),
        }
    }
}
