/// Events emitted by long-running workflows.
///
/// A workflow opens a phase, optionally runs a counted task inside it, and
/// closes the phase. Free-form messages may be interleaved at any point.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Reports a [`Progress::Message`], skipping the allocation when nobody listens.
    pub fn message(&self, text: impl FnOnce() -> String) {
        if self.callback.is_some() {
            self.report(Progress::Message(text()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
        reporter.message(|| unreachable!("message built without a listener"));
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let events = Mutex::new(Vec::new());
        {
            let reporter = ProgressReporter::with_callback(Box::new(|event| {
                events.lock().unwrap().push(event);
            }));
            reporter.report(Progress::PhaseStart { name: "Batch" });
            reporter.report(Progress::TaskStart { total_steps: 2 });
            reporter.message(|| "1ABC 3".to_string());
            reporter.report(Progress::TaskFinish);
        }
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Batch" },
                Progress::TaskStart { total_steps: 2 },
                Progress::Message("1ABC 3".to_string()),
                Progress::TaskFinish,
            ]
        );
    }
}
