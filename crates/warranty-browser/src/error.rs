use chromiumoxide::error::CdpError;
use warranty_core::Error;

/// Translate a CDP failure into the workflow's error vocabulary.
///
/// Transport-level failures mean the browser is gone, so they become
/// `SessionLost`. A request timeout (including a page load that never
/// finishes) stays a `Timeout` local to the current lookup. DOM nodes that
/// disappeared between lookup and use become `Stale`.
pub(crate) fn from_cdp(err: CdpError, context: &str) -> Error {
    match err {
        CdpError::Ws(_)
        | CdpError::ChannelSendError(_)
        | CdpError::NoResponse
        | CdpError::Io(_) => Error::SessionLost(format!("{}: {}", context, err)),
        CdpError::Timeout => Error::Timeout(context.to_string()),
        CdpError::NotFound => Error::NotFound(context.to_string()),
        CdpError::Chrome(ref chrome) if is_detached_node(&chrome.message) => {
            Error::Stale(format!("{}: {}", context, chrome.message))
        }
        other => Error::Browser(format!("{}: {}", context, other)),
    }
}

fn is_detached_node(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("no node with given id")
        || message.contains("could not find node")
        || message.contains("cannot find context")
        || message.contains("node is detached")
}
