use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;
use warranty_core::{ResultRecord, WorkItem};
use warranty_lookup::Progress;

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}";

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

/// Draw target shared by the progress bar and log output
fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

/// Stderr writer for log events that clears the progress bar around each
/// line, so log output and the bar never tear each other.
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        multi_progress().suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        multi_progress().suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// `MakeWriter` for the tracing subscriber
pub fn log_writer() -> LogWriter {
    LogWriter
}

/// Terminal progress bar over the whole input, starting at the number of
/// serials earlier runs already completed
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn begin(&mut self, total: usize, already_done: usize) {
        let bar = multi_progress().add(ProgressBar::new(total as u64));
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_position(already_done as u64);
        self.bar = Some(bar);
    }

    fn item_started(&mut self, _position: usize, item: &WorkItem) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("SN {}", item.serial));
        }
    }

    fn item_finished(&mut self, record: &ResultRecord) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("SN {}: {}", record.serial, record.status));
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("done");
            multi_progress().remove(&bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warranty_core::FailureKind;

    #[test]
    fn test_log_lines_pass_through_while_bar_is_active() {
        let mut progress = BarProgress::new();
        progress.begin(3, 1);

        let line = b"Processing 2/3 - Serial Number: ABC123\n";
        let mut writer = log_writer();
        writer.write_all(line).unwrap();
        assert_eq!(writer.write(line).unwrap(), line.len());

        let bar = progress.bar.clone().unwrap();
        assert_eq!(bar.position(), 1);
        assert!(!bar.is_finished());

        progress.finish();
        assert!(bar.is_finished());
    }

    #[test]
    fn test_bar_starts_at_already_done_and_advances() {
        let mut progress = BarProgress::new();
        progress.begin(4, 2);

        let item = WorkItem::new("ABC123", None, "Laptop-1");
        progress.item_started(3, &item);
        progress.item_finished(&ResultRecord::failure(&item, FailureKind::NavigationTimeout));

        let bar = progress.bar.clone().unwrap();
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.position(), 3);
        assert!(bar.message().contains("Navigation Timeout"));
    }
}
