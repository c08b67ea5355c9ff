#[derive(Debug, Clone)]
pub enum Progress {
    RunStart { total_steps: u64 },
    StepFinished { step: u64 },
    SnapshotWritten { step: u64 },
    RunFinish,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        ProgressReporter::new().report(Progress::RunFinish);
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::StepFinished { step } = event {
                seen.lock().unwrap().push(step);
            }
        }));

        for step in 1..=3 {
            reporter.report(Progress::StepFinished { step });
        }
        reporter.report(Progress::RunFinish);
        drop(reporter);

        assert_eq!(seen.into_inner().unwrap(), vec![1, 2, 3]);
    }
}
