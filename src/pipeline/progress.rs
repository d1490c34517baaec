// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for a report run
// reference: uses indicatif for progress bars and tracks summarization metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub documents_summarized: usize,
    pub documents_skipped: usize,
    pub spec_sources: usize,
    pub model_calls: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents_seen(&self) -> usize {
        self.documents_summarized + self.documents_skipped
    }

    pub fn seconds_per_call(&self) -> f64 {
        if self.model_calls == 0 {
            return 0.0;
        }
        self.duration_secs as f64 / self.model_calls as f64
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_summarized: AtomicUsize,
    documents_skipped: AtomicUsize,
    spec_sources: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_documents: usize, visible: bool) -> Self {
        let multi_progress = MultiProgress::new();
        if !visible {
            multi_progress.set_draw_target(ProgressDrawTarget::hidden());
        }

        let main_bar = create_progress_bar(&multi_progress, total_documents as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            documents_summarized: AtomicUsize::new(0),
            documents_skipped: AtomicUsize::new(0),
            spec_sources: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_total(&self, total_documents: usize) {
        self.main_bar.set_length(total_documents as u64);
    }

    pub fn inc_summarized(&self) {
        self.documents_summarized.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_skipped(&self) {
        self.documents_skipped.fetch_add(1, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn set_spec_sources(&self, count: usize) {
        self.spec_sources.store(count, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Summaries complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self, model_calls: usize) -> PipelineStats {
        PipelineStats {
            documents_summarized: self.documents_summarized.load(Ordering::SeqCst),
            documents_skipped: self.documents_skipped.load(Ordering::SeqCst),
            spec_sources: self.spec_sources.load(Ordering::SeqCst),
            model_calls,
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let summarized = self.documents_summarized.load(Ordering::SeqCst);
        let skipped = self.documents_skipped.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Summarized: {} | Skipped: {}", summarized, skipped));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let mut stats = PipelineStats::new();
        stats.documents_summarized = 3;
        stats.documents_skipped = 2;
        stats.model_calls = 5;
        stats.duration_secs = 10;

        assert_eq!(stats.documents_seen(), 5);
        assert_eq!(stats.seconds_per_call(), 2.0);
    }

    #[test]
    fn test_pipeline_stats_zero_calls() {
        let stats = PipelineStats::new();
        assert_eq!(stats.seconds_per_call(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::new(3, false);

        tracker.inc_summarized();
        tracker.inc_summarized();
        tracker.inc_skipped();
        tracker.set_spec_sources(2);

        let stats = tracker.get_stats(4);
        assert_eq!(stats.documents_summarized, 2);
        assert_eq!(stats.documents_skipped, 1);
        assert_eq!(stats.spec_sources, 2);
        assert_eq!(stats.model_calls, 4);
    }
}
