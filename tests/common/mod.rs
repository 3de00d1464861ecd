#![allow(dead_code)]

use foliolab::domain::job::{JobStage, Milestone};
use foliolab::ports::progress_port::ProgressPort;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Progress(u8),
    Complete,
}

/// Observer that records every callback; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(p) => Some(p),
                Event::Complete => None,
            })
            .collect()
    }

    pub fn completions(&self) -> usize {
        self.events()
            .into_iter()
            .filter(|e| *e == Event::Complete)
            .count()
    }
}

impl ProgressPort for RecordingProgress {
    fn on_progress(&mut self, percent: u8) {
        self.events.lock().unwrap().push(Event::Progress(percent));
    }

    fn on_complete(&mut self) {
        self.events.lock().unwrap().push(Event::Complete);
    }
}

/// `[(20,800),(45,1600),(70,2400),(85,3200),(100,4000)]`
pub fn demo_stage() -> JobStage {
    JobStage::new(vec![
        Milestone::new(20, 800),
        Milestone::new(45, 1600),
        Milestone::new(70, 2400),
        Milestone::new(85, 3200),
        Milestone::new(100, 4000),
    ])
    .unwrap()
}

/// Let spawned tasks run without advancing the paused clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
