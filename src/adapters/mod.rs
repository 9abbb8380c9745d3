mod recording_runner;
mod shell;

pub use recording_runner::RecordingRunner;
pub use shell::ShellRunner;
