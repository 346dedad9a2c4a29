use indicatif::{ProgressBar, ProgressStyle};

/// Bar tracking hosts completed out of the batch total, driven by the pipeline's
/// progress callback.
pub fn host_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{spinner:.blue} [{bar:30.green}] {pos}/{len} hosts")
        .unwrap()
        .progress_chars("█▓░");
    bar.set_style(style);
    bar
}
