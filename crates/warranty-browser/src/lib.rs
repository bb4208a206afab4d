// Chrome-backed implementation of the browser session used by the lookup workflow

mod chrome_finder;
mod error;
mod launcher;
mod profile;
mod session;

pub use chrome_finder::ChromeFinder;
pub use launcher::ChromeSessionLauncher;
pub use profile::ProfileDir;
pub use session::{ChromeElement, ChromeSession};
